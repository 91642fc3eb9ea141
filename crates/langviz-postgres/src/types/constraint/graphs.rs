//! Graphs table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Graphs table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum GraphConstraints {
    #[strum(serialize = "graphs_pkey")]
    IdUnique,

    #[strum(serialize = "graphs_id_not_empty")]
    IdNotEmpty,
    #[strum(serialize = "graphs_name_length")]
    NameLength,
}

impl GraphConstraints {
    /// Creates a new [`GraphConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            GraphConstraints::IdUnique => ConstraintCategory::Uniqueness,
            GraphConstraints::IdNotEmpty | GraphConstraints::NameLength => {
                ConstraintCategory::Validation
            }
        }
    }
}

impl From<GraphConstraints> for String {
    #[inline]
    fn from(val: GraphConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for GraphConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
