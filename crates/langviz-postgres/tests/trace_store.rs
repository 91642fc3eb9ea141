//! Repository tests against a live database.
//!
//! Ignored by default. Run them with `cargo test -- --ignored` and
//! `POSTGRES_URL` pointing at a database the tests may migrate.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use langviz_postgres::model::{DEFAULT_GRAPH_NAME, NewGraph, NewGraphEdge, NewGraphStep};
use langviz_postgres::query::{GraphRepository, GraphTrace, GraphTraceRepository};
use langviz_postgres::{PgClient, PgClientExt, PgConfig, PgConn};
use serde_json::json;
use tokio::sync::Mutex;

static MIGRATIONS: Mutex<()> = Mutex::const_new(());
static SEQUENCE: AtomicU32 = AtomicU32::new(0);

async fn connect() -> anyhow::Result<PgConn> {
    let url = std::env::var("POSTGRES_URL").context("POSTGRES_URL must be set")?;

    let client = PgClient::new(PgConfig::new(url).with_max_connections(2))?;
    {
        let _guard = MIGRATIONS.lock().await;
        client.run_pending_migrations().await?;
    }

    Ok(client.get_connection().await?)
}

fn unique_graph_id(label: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("test-{label}-{}-{nanos}-{seq}", std::process::id())
}

fn sample_steps(graph_id: &str) -> Vec<NewGraphStep> {
    let output = json!({"msg": "hi"});
    vec![
        NewGraphStep::new(graph_id, "start", 0, Some(&json!({})), Some(&output)),
        NewGraphStep::new(graph_id, "agent", 2, None, Some(&json!([1, 2]))),
        NewGraphStep::new(graph_id, "agent", 1, Some(&json!({"q": "x"})), None),
    ]
}

fn sample_edges(graph_id: &str) -> Vec<NewGraphEdge> {
    vec![
        NewGraphEdge {
            graph_id: graph_id.to_owned(),
            source_node: "start".to_owned(),
            target_node: "agent".to_owned(),
            condition_key: None,
            used_count: 1,
        },
        NewGraphEdge {
            graph_id: graph_id.to_owned(),
            source_node: "agent".to_owned(),
            target_node: "end".to_owned(),
            condition_key: Some("done".to_owned()),
            used_count: 2,
        },
    ]
}

#[tokio::test]
#[ignore = "requires POSTGRES_URL"]
async fn create_graph_defaults_name() -> anyhow::Result<()> {
    let mut conn = connect().await?;

    let graph_id = unique_graph_id("name");
    let graph = conn.create_graph(NewGraph::new(&graph_id, None)).await?;
    assert_eq!(graph.name, DEFAULT_GRAPH_NAME);

    let found = conn.find_graph_by_id(&graph_id).await?;
    assert_eq!(found.map(|g| g.id), Some(graph_id.clone()));

    assert!(conn.delete_graph(&graph_id).await?);
    assert!(!conn.delete_graph(&graph_id).await?);
    Ok(())
}

#[tokio::test]
#[ignore = "requires POSTGRES_URL"]
async fn duplicate_graph_id_is_rejected() -> anyhow::Result<()> {
    let mut conn = connect().await?;

    let graph_id = unique_graph_id("duplicate");
    conn.create_graph(NewGraph::new(&graph_id, Some("first".to_owned())))
        .await?;
    let second = conn.create_graph(NewGraph::new(&graph_id, None)).await;
    assert!(second.is_err());

    conn.delete_graph(&graph_id).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires POSTGRES_URL"]
async fn latest_graph_is_listed_first() -> anyhow::Result<()> {
    let mut conn = connect().await?;

    let older = unique_graph_id("older");
    let newer = unique_graph_id("newer");
    conn.create_graph(NewGraph::new(&older, None)).await?;
    conn.create_graph(NewGraph::new(&newer, None)).await?;

    let listed: Vec<_> = conn
        .list_graphs()
        .await?
        .into_iter()
        .map(|g| g.id)
        .filter(|id| *id == older || *id == newer)
        .collect();
    assert_eq!(listed, vec![newer.clone(), older.clone()]);

    assert!(conn.find_latest_graph().await?.is_some());

    conn.delete_graph(&older).await?;
    conn.delete_graph(&newer).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires POSTGRES_URL"]
async fn replaced_trace_reads_back_ordered() -> anyhow::Result<()> {
    let mut conn = connect().await?;

    let graph_id = unique_graph_id("trace");
    conn.create_graph(NewGraph::new(&graph_id, None)).await?;

    let replaced = conn
        .replace_graph_trace(
            graph_id.clone(),
            sample_steps(&graph_id),
            sample_edges(&graph_id),
        )
        .await?;
    assert_eq!(replaced.steps_inserted, 3);
    assert_eq!(replaced.edges_inserted, 2);
    assert_eq!(replaced.steps_removed, 0);

    let trace = conn.load_graph_trace(&graph_id).await?;
    let order: Vec<_> = trace
        .steps
        .iter()
        .map(|s| (s.node_name.as_str(), s.step_index))
        .collect();
    assert_eq!(order, vec![("agent", 1), ("agent", 2), ("start", 0)]);
    assert_eq!(trace.steps[2].output()?, json!({"msg": "hi"}));
    assert_eq!(trace.steps[1].input()?, json!({}));
    assert_eq!(trace.edges.len(), 2);
    assert_eq!(trace.edges[1].condition_key.as_deref(), Some("done"));

    conn.delete_graph(&graph_id).await?;
    let trace = conn.load_graph_trace(&graph_id).await?;
    assert!(trace.steps.is_empty());
    assert!(trace.edges.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "requires POSTGRES_URL"]
async fn second_snapshot_supersedes_first() -> anyhow::Result<()> {
    let mut conn = connect().await?;

    let graph_id = unique_graph_id("supersede");
    conn.create_graph(NewGraph::new(&graph_id, None)).await?;
    conn.replace_graph_trace(
        graph_id.clone(),
        sample_steps(&graph_id),
        sample_edges(&graph_id),
    )
    .await?;

    let steps = vec![NewGraphStep::new(&graph_id, "only", 0, None, None)];
    let replaced = conn
        .replace_graph_trace(graph_id.clone(), steps, Vec::new())
        .await?;
    assert_eq!(replaced.steps_removed, 3);
    assert_eq!(replaced.edges_removed, 2);

    let first = conn.load_graph_trace(&graph_id).await?;
    let second = conn.load_graph_trace(&graph_id).await?;
    assert_eq!(first, second);
    assert_eq!(first.steps.len(), 1);
    assert_eq!(first.steps[0].node_name, "only");
    assert!(first.edges.is_empty());

    conn.delete_graph(&graph_id).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires POSTGRES_URL"]
async fn replacing_unknown_graph_fails() -> anyhow::Result<()> {
    let mut conn = connect().await?;

    let graph_id = unique_graph_id("missing");
    let result = conn
        .replace_graph_trace(graph_id.clone(), sample_steps(&graph_id), Vec::new())
        .await;
    assert!(result.is_err());

    let trace = conn.load_graph_trace(&graph_id).await?;
    assert!(trace.steps.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "requires POSTGRES_URL"]
async fn same_snapshot_twice_is_idempotent() -> anyhow::Result<()> {
    let mut conn = connect().await?;

    let graph_id = unique_graph_id("idempotent");
    conn.create_graph(NewGraph::new(&graph_id, None)).await?;

    conn.replace_graph_trace(
        graph_id.clone(),
        sample_steps(&graph_id),
        sample_edges(&graph_id),
    )
    .await?;
    let first = conn.load_graph_trace(&graph_id).await?;

    let replaced = conn
        .replace_graph_trace(
            graph_id.clone(),
            sample_steps(&graph_id),
            sample_edges(&graph_id),
        )
        .await?;
    let second = conn.load_graph_trace(&graph_id).await?;

    assert_eq!(replaced.steps_removed, replaced.steps_inserted);
    assert_eq!(replaced.edges_removed, replaced.edges_inserted);

    // Surrogate ids differ between the two snapshots.
    let content = |trace: &GraphTrace| {
        let steps: Vec<_> = trace
            .steps
            .iter()
            .map(|s| {
                (
                    s.node_name.clone(),
                    s.step_index,
                    s.input_json.clone(),
                    s.output_json.clone(),
                )
            })
            .collect();
        let edges: Vec<_> = trace
            .edges
            .iter()
            .map(|e| {
                (
                    e.source_node.clone(),
                    e.target_node.clone(),
                    e.condition_key.clone(),
                    e.used_count_or_default(),
                )
            })
            .collect();
        (steps, edges)
    };
    assert_eq!(content(&first), content(&second));
    assert_eq!(second.steps.len(), 3);

    conn.delete_graph(&graph_id).await?;
    Ok(())
}
