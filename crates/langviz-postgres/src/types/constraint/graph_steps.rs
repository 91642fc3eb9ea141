//! Graph steps table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Graph steps table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum GraphStepConstraints {
    #[strum(serialize = "graph_steps_graph_id_fkey")]
    GraphExists,

    #[strum(serialize = "graph_steps_node_name_not_empty")]
    NodeNameNotEmpty,
}

impl GraphStepConstraints {
    /// Creates a new [`GraphStepConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            GraphStepConstraints::GraphExists => ConstraintCategory::Referential,
            GraphStepConstraints::NodeNameNotEmpty => ConstraintCategory::Validation,
        }
    }
}

impl From<GraphStepConstraints> for String {
    #[inline]
    fn from(val: GraphStepConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for GraphStepConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
