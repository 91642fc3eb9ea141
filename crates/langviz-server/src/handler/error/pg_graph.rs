//! Graph, step and edge constraint violation handlers.

use langviz_postgres::types::{GraphConstraints, GraphEdgeConstraints, GraphStepConstraints};

use super::pg_error::graph_not_found;
use crate::handler::{Error, ErrorKind};

impl From<GraphConstraints> for Error<'static> {
    fn from(c: GraphConstraints) -> Self {
        let error = match c {
            GraphConstraints::IdUnique => ErrorKind::Conflict
                .with_message("A graph with this id already exists")
                .with_suggestion("Generate a new graphId for every traced run"),
            GraphConstraints::IdNotEmpty => ErrorKind::BadRequest.with_message("graphId is missing"),
            GraphConstraints::NameLength => ErrorKind::BadRequest
                .with_message("Graph name must be between 1 and 255 characters long"),
        };

        error.with_resource("graph")
    }
}

impl From<GraphStepConstraints> for Error<'static> {
    fn from(c: GraphStepConstraints) -> Self {
        match c {
            GraphStepConstraints::GraphExists => graph_not_found(),
            GraphStepConstraints::NodeNameNotEmpty => ErrorKind::BadRequest
                .with_message("Node names cannot be empty")
                .with_resource("graph_step"),
        }
    }
}

impl From<GraphEdgeConstraints> for Error<'static> {
    fn from(c: GraphEdgeConstraints) -> Self {
        let error = match c {
            GraphEdgeConstraints::GraphExists => return graph_not_found(),
            GraphEdgeConstraints::SourceNodeNotEmpty => {
                ErrorKind::BadRequest.with_message("Edge source cannot be empty")
            }
            GraphEdgeConstraints::TargetNodeNotEmpty => {
                ErrorKind::BadRequest.with_message("Edge target cannot be empty")
            }
            GraphEdgeConstraints::UsedCountMin => {
                ErrorKind::BadRequest.with_message("Edge usedCount cannot be negative")
            }
        };

        error.with_resource("graph_edge")
    }
}

#[cfg(test)]
mod tests {
    use langviz_postgres::types::ConstraintViolation;

    use super::*;

    #[test]
    fn duplicate_graph_is_a_conflict() {
        let error: Error = GraphConstraints::IdUnique.into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.resource(), Some("graph"));
    }

    #[test]
    fn missing_parent_graph_is_not_found() {
        for name in ["graph_steps_graph_id_fkey", "graph_edges_graph_id_fkey"] {
            let Some(constraint) = ConstraintViolation::new(name) else {
                panic!("unknown constraint {name}");
            };

            let error: Error = constraint.into();
            assert_eq!(error.kind(), ErrorKind::NotFound);
            assert_eq!(error.resource(), Some("graph"));
        }
    }

    #[test]
    fn validation_constraints_are_bad_requests() {
        let error: Error = GraphEdgeConstraints::UsedCountMin.into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("graph_edge"));

        let error: Error = GraphStepConstraints::NodeNameNotEmpty.into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);

        let error: Error = GraphConstraints::IdNotEmpty.into();
        assert_eq!(error.message(), Some("graphId is missing"));
    }
}
