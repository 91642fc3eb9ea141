//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Every route is served twice: at the root, and under `/api` where the
//! producer SDK posts its events.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod graphs;
mod monitors;
pub mod request;
pub mod response;
mod traces;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub(crate) use crate::handler::error::graph_not_found;
pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Prefix under which all routes are also mounted.
pub const API_PREFIX: &str = "/api";

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound
        .with_message("Route not found")
        .into_response()
}

/// Returns an [`ApiRouter`] with all routes mounted under `prefix`.
fn prefixed_routes(prefix: &str) -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(graphs::routes(prefix))
        .merge(traces::routes(prefix))
        .merge(monitors::routes(prefix))
}

/// Returns an [`ApiRouter`] with all routes, at the root and under [`API_PREFIX`].
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(prefixed_routes(""))
        .merge(prefixed_routes(API_PREFIX))
        .fallback(fallback)
}

#[cfg(test)]
pub(crate) mod test {
    use aide::axum::ApiRouter;
    use aide::openapi::OpenApi;
    use axum_test::TestServer;
    use langviz_postgres::{PgClient, PgConfig};

    use crate::handler::routes;
    use crate::service::{HealthCache, ServiceState};

    /// Returns state backed by a pool that points at a closed port.
    ///
    /// The pool connects lazily, so requests rejected before checkout never
    /// touch the store, and probes fail fast.
    pub fn create_test_state() -> anyhow::Result<ServiceState> {
        let config = PgConfig::new("postgresql://langviz@127.0.0.1:1/langviz")
            .with_connection_timeout_secs(1);
        let postgres = PgClient::new(config)?;
        Ok(ServiceState::from_parts(postgres, HealthCache::new()))
    }

    /// Returns a new [`TestServer`] with the given router.
    pub async fn create_test_server_with_router(
        router: impl Fn() -> ApiRouter<ServiceState>,
    ) -> anyhow::Result<TestServer> {
        let state = create_test_state()?;
        create_test_server_with_state(router(), state).await
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub async fn create_test_server_with_state(
        router: ApiRouter<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let mut api = OpenApi::default();
        let app = router.finish_api(&mut api).with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with every route.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_router(routes).await
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/graph/unknown").await;
        response.assert_status_not_found();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "not_found");
        assert_eq!(body["error"], "Route not found");
        Ok(())
    }

    #[tokio::test]
    async fn routes_are_served_with_and_without_prefix() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        for path in ["/graph/load", "/api/graph/load"] {
            let response = server.get(path).await;
            response.assert_status_bad_request();
        }

        Ok(())
    }
}
