//! Trace snapshot handlers.
//!
//! The producer posts its complete view of a run after every step. Each
//! ingestion replaces the stored trace in one transaction, so the viewer
//! polling `GET /graph/load` sees either the previous snapshot or the new one.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use langviz_postgres::PgClient;
use langviz_postgres::query::GraphTraceRepository;

use super::request::{GraphQuery, IngestTrace};
use super::response::{ErrorResponse, IngestStatus, TraceSnapshot};
use crate::extract::{Json, PgPool, ValidateJson, ValidateQuery};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for trace operations.
const TRACING_TARGET: &str = "langviz_server::handler::traces";

/// Replaces the stored trace of a graph with the posted snapshot.
#[tracing::instrument(skip_all, fields(graph_id = request.graph_id()))]
async fn ingest_trace(
    State(pg_client): State<PgClient>,
    ValidateJson(request): ValidateJson<IngestTrace>,
) -> Result<(StatusCode, Json<IngestStatus>)> {
    let graph_id = request.graph_id().to_owned();
    let (steps, edges) = request.into_models(&graph_id);

    tracing::debug!(
        target: TRACING_TARGET,
        step_count = steps.len(),
        edge_count = edges.len(),
        "ingesting snapshot"
    );

    let mut conn = pg_client.get_connection().await?;
    let replaced = conn.replace_graph_trace(graph_id, steps, edges).await?;

    tracing::info!(
        target: TRACING_TARGET,
        steps_removed = replaced.steps_removed,
        edges_removed = replaced.edges_removed,
        steps_inserted = replaced.steps_inserted,
        edges_inserted = replaced.edges_inserted,
        "snapshot ingested"
    );

    Ok((StatusCode::OK, Json(IngestStatus::default())))
}

fn ingest_trace_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Ingest snapshot")
        .description(
            "Replaces every stored step and edge of the graph with the posted snapshot. \
             Missing or null payloads are stored as empty objects.",
        )
        .response::<200, Json<IngestStatus>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<413, Json<ErrorResponse>>()
}

/// Reconstructs the stored trace of a graph.
#[tracing::instrument(skip_all, fields(graph_id = query.graph_id()))]
async fn load_trace(
    ValidateQuery(query): ValidateQuery<GraphQuery>,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<TraceSnapshot>)> {
    let trace = conn.load_graph_trace(query.graph_id()).await?;
    let snapshot = TraceSnapshot::from_trace(trace);

    tracing::debug!(
        target: TRACING_TARGET,
        node_count = snapshot.nodes.len(),
        step_count = snapshot.step_count(),
        edge_count = snapshot.edges.len(),
        "snapshot loaded"
    );

    Ok((StatusCode::OK, Json(snapshot)))
}

fn load_trace_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Load snapshot")
        .description(
            "Returns the stored trace grouped by node, each node's calls ordered by step index. \
             An unknown or empty graph yields empty nodes and edges.",
        )
        .response::<200, Json<TraceSnapshot>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Returns an [`ApiRouter`] with all trace routes under `prefix`.
pub fn routes(prefix: &str) -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            &format!("{prefix}/graph/ingest"),
            post_with(ingest_trace, ingest_trace_docs),
        )
        .api_route(
            &format!("{prefix}/graph/load"),
            get_with(load_trace, load_trace_docs),
        )
        .with_path_items(|item| item.tag("Traces"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use langviz_postgres::model::{GraphEdge, GraphStep};
    use langviz_postgres::query::GraphTrace;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::create_test_server_with_router;

    /// Builds the rows the store would hold after ingesting `request`.
    fn stored_trace(request: IngestTrace) -> GraphTrace {
        let graph_id = request.graph_id().to_owned();
        let (steps, edges) = request.into_models(&graph_id);

        let mut steps: Vec<_> = steps
            .into_iter()
            .zip(1..)
            .map(|(step, id)| GraphStep {
                id,
                graph_id: step.graph_id,
                node_name: step.node_name,
                step_index: step.step_index,
                input_json: step.input_json,
                output_json: step.output_json,
            })
            .collect();
        steps.sort_by(|a, b| {
            (&a.node_name, a.step_index, a.id).cmp(&(&b.node_name, b.step_index, b.id))
        });

        let edges = edges
            .into_iter()
            .zip(1..)
            .map(|(edge, id)| GraphEdge {
                id,
                graph_id: edge.graph_id,
                source_node: edge.source_node,
                target_node: edge.target_node,
                condition_key: edge.condition_key,
                used_count: Some(edge.used_count),
            })
            .collect();

        GraphTrace { steps, edges }
    }

    #[test]
    fn ingested_snapshot_loads_back_unchanged() -> anyhow::Result<()> {
        let nodes = json!({
            "start": [{ "stepIndex": 0, "input": {}, "output": { "msg": "hi" } }],
            "agent": [
                { "stepIndex": 3, "input": { "q": [1, 2] }, "output": "done" },
                { "stepIndex": 1, "input": { "q": "x" }, "output": { "nested": { "ok": true } } }
            ]
        });
        let request: IngestTrace = serde_json::from_value(json!({
            "graphId": "g1",
            "nodes": nodes,
            "edges": [
                { "source": "start", "target": "agent", "used_count": 1 },
                { "source": "agent", "target": "end", "usedCount": 2, "conditionKey": "__end__" }
            ]
        }))?;

        let snapshot = TraceSnapshot::from_trace(stored_trace(request));
        let value = serde_json::to_value(&snapshot)?;

        let keys: Vec<_> = snapshot.nodes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["agent", "start"]);
        assert_eq!(
            value["nodes"],
            json!({
                "start": [{ "stepIndex": 0, "input": {}, "output": { "msg": "hi" } }],
                "agent": [
                    { "stepIndex": 1, "input": { "q": "x" }, "output": { "nested": { "ok": true } } },
                    { "stepIndex": 3, "input": { "q": [1, 2] }, "output": "done" }
                ]
            })
        );
        assert_eq!(
            value["edges"],
            json!([
                { "source": "start", "target": "agent", "used_count": 1 },
                { "source": "agent", "target": "end", "conditionKey": "__end__", "used_count": 2 }
            ])
        );
        Ok(())
    }

    #[test]
    fn started_node_without_output_loads_as_empty_object() -> anyhow::Result<()> {
        let request: IngestTrace = serde_json::from_value(json!({
            "graphId": "g1",
            "nodes": { "agent": [{ "stepIndex": 0, "input": { "q": 1 }, "output": null }] }
        }))?;

        let snapshot = TraceSnapshot::from_trace(stored_trace(request));
        assert_eq!(snapshot.nodes["agent"][0].output, json!({}));
        assert!(snapshot.edges.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn ingest_without_graph_id_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|| routes("")).await?;

        let response = server
            .post("/graph/ingest")
            .json(&json!({ "nodes": {}, "edges": [] }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "graphId is missing");
        Ok(())
    }

    #[tokio::test]
    async fn ingest_with_wrong_types_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|| routes("")).await?;

        let response = server
            .post("/graph/ingest")
            .json(&json!({ "graphId": "g1", "nodes": [] }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["name"], "bad_request");
        Ok(())
    }

    #[tokio::test]
    async fn load_without_graph_id_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|| routes("/api")).await?;

        let response = server.get("/api/graph/load").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body = response.json::<Value>();
        assert_eq!(body["error"], "graphId is missing");
        assert_eq!(body["resource"], "request");
        Ok(())
    }

    #[tokio::test]
    async fn load_with_empty_graph_id_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|| routes("")).await?;

        let response = server.get("/graph/load").add_query_param("graphId", "").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}
