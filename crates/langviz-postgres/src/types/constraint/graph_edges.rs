//! Graph edges table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Graph edges table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum GraphEdgeConstraints {
    #[strum(serialize = "graph_edges_graph_id_fkey")]
    GraphExists,

    #[strum(serialize = "graph_edges_source_node_not_empty")]
    SourceNodeNotEmpty,
    #[strum(serialize = "graph_edges_target_node_not_empty")]
    TargetNodeNotEmpty,
    #[strum(serialize = "graph_edges_used_count_min")]
    UsedCountMin,
}

impl GraphEdgeConstraints {
    /// Creates a new [`GraphEdgeConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            GraphEdgeConstraints::GraphExists => ConstraintCategory::Referential,
            GraphEdgeConstraints::SourceNodeNotEmpty
            | GraphEdgeConstraints::TargetNodeNotEmpty
            | GraphEdgeConstraints::UsedCountMin => ConstraintCategory::Validation,
        }
    }
}

impl From<GraphEdgeConstraints> for String {
    #[inline]
    fn from(val: GraphEdgeConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for GraphEdgeConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
