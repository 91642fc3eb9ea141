//! Trace store connection extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};
use langviz_postgres::{PgClient, PgConn};

use crate::handler::{Error, ErrorKind};

/// Checks a [`PgConn`] out of the pool for the duration of a request.
///
/// The connection implements the graph and trace repository traits.
#[derive(Debug, Deref, DerefMut)]
pub struct PgPool(pub PgConn);

impl<S> FromRequestParts<S> for PgPool
where
    PgClient: FromRef<S>,
    S: Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pg_client = PgClient::from_ref(state);
        let conn = pg_client.get_connection().await.map_err(|e| {
            tracing::error!(
                target: "langviz_server::extract::postgres",
                error = %e,
                "failed to acquire database connection"
            );
            ErrorKind::InternalServerError
                .with_message("Trace store unavailable")
                .with_context(e.to_string())
        })?;

        Ok(PgPool(conn))
    }
}

impl aide::OperationInput for PgPool {}
