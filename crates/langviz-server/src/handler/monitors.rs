//! Health check handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;

use super::response::{HealthStatus, MonitorStatus};
use crate::extract::Json;
use crate::handler::Result;
use crate::service::{HealthCache, ServiceState};

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "langviz_server::handler::monitors";

/// Reports whether the trace store is reachable.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(service_state): State<ServiceState>,
    State(health_cache): State<HealthCache>,
) -> Result<(StatusCode, Json<MonitorStatus>)> {
    let is_healthy = health_cache.is_healthy(&service_state).await;
    let status = HealthStatus::from_probe(is_healthy);

    let status_code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        status = %status,
        status_code = status_code.as_u16(),
        "health status checked"
    );

    Ok((status_code, Json(MonitorStatus::new(status))))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get health status")
        .description("Probes the trace store. Results are cached for a short interval.")
        .response::<200, Json<MonitorStatus>>()
        .response::<503, Json<MonitorStatus>>()
}

/// Returns an [`ApiRouter`] with the health route under `prefix`.
pub fn routes(prefix: &str) -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            &format!("{prefix}/health"),
            get_with(health_status, health_status_docs),
        )
        .with_path_items(|item| item.tag("Health"))
}
