//! Graph registry handlers.
//!
//! A graph is registered once per traced run with a producer-generated
//! identifier, before any snapshot is ingested for it.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use langviz_postgres::PgClient;
use langviz_postgres::query::GraphRepository;

use super::request::{GraphQuery, StartGraph};
use super::response::{ErrorResponse, GraphSummaries, GraphSummary, LatestGraph, StartedGraph};
use crate::extract::{Json, PgPool, ValidateJson, ValidateQuery};
use crate::handler::{Result, graph_not_found};
use crate::service::ServiceState;

/// Tracing target for graph registry operations.
const TRACING_TARGET: &str = "langviz_server::handler::graphs";

/// Registers a new graph.
#[tracing::instrument(skip_all)]
async fn start_graph(
    State(pg_client): State<PgClient>,
    ValidateJson(request): ValidateJson<StartGraph>,
) -> Result<(StatusCode, Json<StartedGraph>)> {
    let new_graph = request.into_model();

    tracing::debug!(
        target: TRACING_TARGET,
        graph_id = %new_graph.id,
        name = new_graph.effective_name(),
        "registering graph"
    );

    let mut conn = pg_client.get_connection().await?;
    let graph = conn.create_graph(new_graph).await?;

    tracing::info!(
        target: TRACING_TARGET,
        graph_id = %graph.id,
        untitled = graph.is_untitled(),
        "graph registered"
    );

    Ok((StatusCode::CREATED, Json(StartedGraph::from_model(graph))))
}

fn start_graph_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Register graph")
        .description(
            "Registers a traced run under a producer-generated identifier. \
             The name defaults to \"Untitled\" when omitted or blank.",
        )
        .response::<201, Json<StartedGraph>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns the most recently registered graph.
#[tracing::instrument(skip_all)]
async fn latest_graph(PgPool(mut conn): PgPool) -> Result<(StatusCode, Json<LatestGraph>)> {
    let graph = conn.find_latest_graph().await?;

    tracing::debug!(
        target: TRACING_TARGET,
        found = graph.is_some(),
        "latest graph resolved"
    );

    Ok((StatusCode::OK, Json(LatestGraph::from_model(graph))))
}

fn latest_graph_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get latest graph")
        .description("Returns the identifier of the most recently registered graph, or null.")
        .response::<200, Json<LatestGraph>>()
}

/// Lists all graphs, most recent first.
#[tracing::instrument(skip_all)]
async fn list_graphs(PgPool(mut conn): PgPool) -> Result<(StatusCode, Json<GraphSummaries>)> {
    let graphs = conn.list_graphs().await?;

    tracing::debug!(
        target: TRACING_TARGET,
        graph_count = graphs.len(),
        "graphs listed"
    );

    let graphs = graphs.into_iter().map(GraphSummary::from_model).collect();
    Ok((StatusCode::OK, Json(graphs)))
}

fn list_graphs_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List graphs")
        .description("Returns every registered graph ordered by creation time, newest first.")
        .response::<200, Json<GraphSummaries>>()
}

/// Deletes a graph together with its steps and edges.
#[tracing::instrument(skip_all, fields(graph_id = query.graph_id()))]
async fn delete_graph(
    ValidateQuery(query): ValidateQuery<GraphQuery>,
    PgPool(mut conn): PgPool,
) -> Result<StatusCode> {
    if !conn.delete_graph(query.graph_id()).await? {
        return Err(graph_not_found().with_context(format!("graph_id={}", query.graph_id())));
    }

    tracing::info!(target: TRACING_TARGET, "graph deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn delete_graph_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete graph")
        .description("Removes a graph and its stored trace.")
        .response::<204, ()>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns an [`ApiRouter`] with all graph registry routes under `prefix`.
pub fn routes(prefix: &str) -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            &format!("{prefix}/graph/start"),
            post_with(start_graph, start_graph_docs),
        )
        .api_route(
            &format!("{prefix}/graph/last"),
            get_with(latest_graph, latest_graph_docs),
        )
        .api_route(
            &format!("{prefix}/graphs/list"),
            get_with(list_graphs, list_graphs_docs),
        )
        .api_route(
            &format!("{prefix}/graph"),
            delete_with(delete_graph, delete_graph_docs),
        )
        .with_path_items(|item| item.tag("Graphs"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn start_without_graph_id_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|| routes("")).await?;

        let response = server.post("/graph/start").json(&json!({ "name": "x" })).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body = response.json::<Value>();
        assert_eq!(body["name"], "bad_request");
        assert_eq!(body["error"], "graphId is missing");
        Ok(())
    }

    #[tokio::test]
    async fn start_with_null_graph_id_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|| routes("")).await?;

        let response = server
            .post("/graph/start")
            .json(&json!({ "graphId": null, "name": "x" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "graphId is missing");
        Ok(())
    }

    #[tokio::test]
    async fn start_with_malformed_json_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|| routes("")).await?;

        let response = server
            .post("/graph/start")
            .content_type("application/json")
            .text("{\"graphId\":")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn start_with_overlong_name_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|| routes("/api")).await?;

        let response = server
            .post("/api/graph/start")
            .json(&json!({ "graphId": "g1", "name": "n".repeat(256) }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body = response.json::<Value>();
        assert_eq!(body["validation"][0]["field"], "name");
        Ok(())
    }

    #[tokio::test]
    async fn delete_without_graph_id_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|| routes("")).await?;

        let response = server.delete("/graph").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "graphId is missing");
        Ok(())
    }
}
