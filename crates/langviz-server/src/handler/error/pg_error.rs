//! Trace store error to HTTP error conversion.
//!
//! Known constraint violations are turned into client errors by the
//! per-table conversions in `pg_graph`. Everything else is logged and
//! returned as an opaque internal error.

use langviz_postgres::PgError;
use langviz_postgres::types::ConstraintViolation;

use crate::handler::{Error, ErrorKind};

/// Tracing target for store error conversion.
const TRACING_TARGET: &str = "langviz_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::Graph(c) => c.into(),
            ConstraintViolation::GraphStep(c) => c.into(),
            ConstraintViolation::GraphEdge(c) => c.into(),
        }
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        match error {
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout",
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Connection(connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Query(ref query_error) => {
                if let Some(constraint) = error.constraint_violation() {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        constraint = %constraint,
                        error = %query_error,
                        "query error (constraint violation)"
                    );
                    return constraint.into();
                }

                // The ingest row lock reports an unknown graph as NotFound.
                if error.is_not_found() {
                    return graph_not_found();
                }

                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

// Used by transactions whose closures return diesel errors.
impl From<langviz_postgres::DieselError> for Error<'static> {
    fn from(error: langviz_postgres::DieselError) -> Self {
        PgError::from(error).into()
    }
}

/// Error returned when a request references a graph that does not exist.
pub(crate) fn graph_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("Graph not found")
        .with_resource("graph")
        .with_suggestion("Register the graph with POST /graph/start before ingesting")
}

#[cfg(test)]
mod tests {
    use langviz_postgres::DieselError;

    use super::*;

    #[test]
    fn not_found_query_maps_to_graph_not_found() {
        let error: Error = PgError::Query(DieselError::NotFound).into();

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.resource(), Some("graph"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn opaque_errors_map_to_internal() {
        let error: Error = PgError::Unexpected("pool closed".into()).into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.message(), None);

        let error: Error = PgError::Config("bad url".to_owned()).into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);

        let error: Error = PgError::Query(DieselError::RollbackTransaction).into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
