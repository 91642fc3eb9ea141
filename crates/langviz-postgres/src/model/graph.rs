//! Graph model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::graphs;

/// Name stored when the producer does not supply one.
pub const DEFAULT_GRAPH_NAME: &str = "Untitled";

/// A traced workflow run.
///
/// The identifier is chosen by the producer so it can correlate events before
/// the row exists. Steps and edges reference it and are removed with it.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = graphs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Graph {
    /// Producer-supplied identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Timestamp when the graph was registered.
    pub created_at: Timestamp,
}

/// Data for registering a new graph.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = graphs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewGraph {
    /// Producer-supplied identifier.
    pub id: String,
    /// Display name; `None` stores [`DEFAULT_GRAPH_NAME`].
    pub name: Option<String>,
}

impl NewGraph {
    /// Creates a new graph record, treating a blank name as absent.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.filter(|name| !name.trim().is_empty()),
        }
    }

    /// Returns the name the database will store.
    pub fn effective_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_GRAPH_NAME)
    }
}

impl Graph {
    /// Returns whether the graph still carries the default name.
    pub fn is_untitled(&self) -> bool {
        self.name == DEFAULT_GRAPH_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_falls_back_to_default() {
        let graph = NewGraph::new("g1", Some("   ".to_owned()));
        assert_eq!(graph.name, None);
        assert_eq!(graph.effective_name(), DEFAULT_GRAPH_NAME);

        let graph = NewGraph::new("g1", None);
        assert_eq!(graph.effective_name(), "Untitled");
    }

    #[test]
    fn explicit_name_is_kept_verbatim() {
        let graph = NewGraph::new("g1", Some("Support agent".to_owned()));
        assert_eq!(graph.effective_name(), "Support agent");

        let graph = NewGraph::new("g1", Some(" Agent run ".to_owned()));
        assert_eq!(graph.name.as_deref(), Some(" Agent run "));
    }
}
