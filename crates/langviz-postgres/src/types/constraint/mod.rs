//! Database constraint violations, one enum per table.

mod graph_edges;
mod graph_steps;
mod graphs;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::graph_edges::GraphEdgeConstraints;
pub use self::graph_steps::GraphStepConstraints;
pub use self::graphs::GraphConstraints;

/// Any known constraint of the trace store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    Graph(GraphConstraints),
    GraphStep(GraphStepConstraints),
    GraphEdge(GraphEdgeConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Format, length and range checks.
    Validation,
    /// Primary keys and unique indexes.
    Uniqueness,
    /// Foreign keys to a parent row.
    Referential,
}

impl ConstraintViolation {
    /// Parses a constraint name reported by the database.
    ///
    /// ```
    /// use langviz_postgres::types::{ConstraintViolation, GraphStepConstraints};
    ///
    /// let violation = ConstraintViolation::new("graph_steps_graph_id_fkey");
    /// assert_eq!(
    ///     violation,
    ///     Some(ConstraintViolation::GraphStep(GraphStepConstraints::GraphExists))
    /// );
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        let prefix = constraint.split('_').next()?;
        macro_rules! try_parse {
            ($($parser:expr => $variant:ident),+ $(,)?) => {
                None$(.or_else(|| $parser(constraint).map(Self::$variant)))+
            };
        }

        match prefix {
            "graphs" => try_parse!(GraphConstraints::new => Graph),
            "graph" => try_parse! {
                GraphStepConstraints::new => GraphStep,
                GraphEdgeConstraints::new => GraphEdge,
            },
            _ => None,
        }
    }

    /// Returns the table the constraint is defined on.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::Graph(_) => "graphs",
            ConstraintViolation::GraphStep(_) => "graph_steps",
            ConstraintViolation::GraphEdge(_) => "graph_edges",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Graph(c) => c.categorize(),
            ConstraintViolation::GraphStep(c) => c.categorize(),
            ConstraintViolation::GraphEdge(c) => c.categorize(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Graph(c) => write!(f, "{c}"),
            ConstraintViolation::GraphStep(c) => write!(f, "{c}"),
            ConstraintViolation::GraphEdge(c) => write!(f, "{c}"),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("Unknown constraint: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parses_known_constraints() {
        assert_eq!(
            ConstraintViolation::new("graphs_pkey"),
            Some(ConstraintViolation::Graph(GraphConstraints::IdUnique))
        );
        assert_eq!(
            ConstraintViolation::new("graph_edges_graph_id_fkey"),
            Some(ConstraintViolation::GraphEdge(GraphEdgeConstraints::GraphExists))
        );
        assert_eq!(ConstraintViolation::new("graph_nodes_pkey"), None);
        assert_eq!(ConstraintViolation::new(""), None);
    }

    #[test]
    fn every_name_round_trips() {
        let names = GraphConstraints::iter()
            .map(ConstraintViolation::Graph)
            .chain(GraphStepConstraints::iter().map(ConstraintViolation::GraphStep))
            .chain(GraphEdgeConstraints::iter().map(ConstraintViolation::GraphEdge));

        for violation in names {
            let name = violation.to_string();
            assert_eq!(ConstraintViolation::new(&name), Some(violation));
        }
    }

    #[test]
    fn categorizes_foreign_keys() {
        let violation = ConstraintViolation::GraphStep(GraphStepConstraints::GraphExists);
        assert_eq!(violation.table_name(), "graph_steps");
        assert_eq!(
            violation.constraint_category(),
            ConstraintCategory::Referential
        );

        let violation = ConstraintViolation::Graph(GraphConstraints::IdUnique);
        assert_eq!(
            violation.constraint_category(),
            ConstraintCategory::Uniqueness
        );
    }

    #[test]
    fn serializes_as_constraint_name() -> anyhow::Result<()> {
        let violation = ConstraintViolation::GraphEdge(GraphEdgeConstraints::UsedCountMin);
        let json = serde_json::to_string(&violation)?;
        assert_eq!(json, "\"graph_edges_used_count_min\"");
        assert_eq!(serde_json::from_str::<ConstraintViolation>(&json)?, violation);
        Ok(())
    }
}
