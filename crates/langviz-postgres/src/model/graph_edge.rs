//! Graph edge model for PostgreSQL database operations.

use diesel::prelude::*;

use crate::schema::graph_edges;

/// A directed transition between two nodes and how often it fired.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = graph_edges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GraphEdge {
    /// Surrogate identifier.
    pub id: i64,
    /// Graph this edge belongs to.
    pub graph_id: String,
    /// Node the transition leaves.
    pub source_node: String,
    /// Node the transition enters.
    pub target_node: String,
    /// Branch key of a conditional transition.
    pub condition_key: Option<String>,
    /// Number of times the transition fired.
    pub used_count: Option<i32>,
}

impl GraphEdge {
    /// Returns the usage count, treating `NULL` as zero.
    pub fn used_count_or_default(&self) -> i32 {
        self.used_count.unwrap_or_default()
    }

    /// Returns whether the transition belongs to a conditional branch.
    pub fn is_conditional(&self) -> bool {
        self.condition_key.is_some()
    }
}

/// Data for recording an edge.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = graph_edges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewGraphEdge {
    /// Graph this edge belongs to.
    pub graph_id: String,
    /// Node the transition leaves.
    pub source_node: String,
    /// Node the transition enters.
    pub target_node: String,
    /// Branch key of a conditional transition.
    pub condition_key: Option<String>,
    /// Number of times the transition fired.
    pub used_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_used_count_reads_as_zero() {
        let edge = GraphEdge {
            id: 7,
            graph_id: "g1".to_owned(),
            source_node: "start".to_owned(),
            target_node: "end".to_owned(),
            condition_key: None,
            used_count: None,
        };

        assert_eq!(edge.used_count_or_default(), 0);
        assert!(!edge.is_conditional());
    }
}
