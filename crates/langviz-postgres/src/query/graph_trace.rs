//! Trace repository for replacing and reading a graph's steps and edges.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::model::{GraphEdge, GraphStep, NewGraphEdge, NewGraphStep};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Rows per `INSERT` statement.
///
/// Keeps a single statement well below the 65535 bind parameter limit.
const INSERT_CHUNK_SIZE: usize = 1000;

/// Row counts of a snapshot replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplacedTrace {
    /// Steps of the previous snapshot that were removed.
    pub steps_removed: usize,
    /// Edges of the previous snapshot that were removed.
    pub edges_removed: usize,
    /// Steps of the new snapshot.
    pub steps_inserted: usize,
    /// Edges of the new snapshot.
    pub edges_inserted: usize,
}

/// All stored steps and edges of one graph, read from a single snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphTrace {
    /// Steps ordered by node name, then step index.
    pub steps: Vec<GraphStep>,
    /// Edges in insertion order.
    pub edges: Vec<GraphEdge>,
}

/// Repository for the steps and edges recorded for a graph.
pub trait GraphTraceRepository {
    /// Replaces the stored steps and edges of a graph with a new snapshot.
    ///
    /// Runs in one transaction that first locks the graph row, so concurrent
    /// replacements for the same graph are serialized and readers never see a
    /// partial snapshot. Fails with [`diesel::result::Error::NotFound`] if the
    /// graph does not exist.
    fn replace_graph_trace(
        &mut self,
        graph_id: String,
        steps: Vec<NewGraphStep>,
        edges: Vec<NewGraphEdge>,
    ) -> impl Future<Output = PgResult<ReplacedTrace>> + Send;

    /// Reads the steps and edges of a graph in one repeatable-read transaction.
    ///
    /// An unknown graph yields an empty trace.
    fn load_graph_trace(
        &mut self,
        graph_id: &str,
    ) -> impl Future<Output = PgResult<GraphTrace>> + Send;

    /// Lists the steps of a graph ordered by node name, then step index.
    fn list_graph_steps(
        &mut self,
        graph_id: &str,
    ) -> impl Future<Output = PgResult<Vec<GraphStep>>> + Send;

    /// Lists the edges of a graph in insertion order.
    fn list_graph_edges(
        &mut self,
        graph_id: &str,
    ) -> impl Future<Output = PgResult<Vec<GraphEdge>>> + Send;
}

impl GraphTraceRepository for PgConnection {
    async fn replace_graph_trace(
        &mut self,
        trace_graph_id: String,
        steps: Vec<NewGraphStep>,
        edges: Vec<NewGraphEdge>,
    ) -> PgResult<ReplacedTrace> {
        use schema::{graph_edges, graph_steps, graphs};

        let replaced = self
            .transaction::<_, PgError, _>(|conn| {
                async move {
                    graphs::table
                        .filter(graphs::id.eq(&trace_graph_id))
                        .select(graphs::id)
                        .for_update()
                        .first::<String>(conn)
                        .await?;

                    let steps_removed = diesel::delete(
                        graph_steps::table.filter(graph_steps::graph_id.eq(&trace_graph_id)),
                    )
                    .execute(conn)
                    .await?;

                    let edges_removed = diesel::delete(
                        graph_edges::table.filter(graph_edges::graph_id.eq(&trace_graph_id)),
                    )
                    .execute(conn)
                    .await?;

                    let mut steps_inserted = 0;
                    for chunk in steps.chunks(INSERT_CHUNK_SIZE) {
                        steps_inserted += diesel::insert_into(graph_steps::table)
                            .values(chunk)
                            .execute(conn)
                            .await?;
                    }

                    let mut edges_inserted = 0;
                    for chunk in edges.chunks(INSERT_CHUNK_SIZE) {
                        edges_inserted += diesel::insert_into(graph_edges::table)
                            .values(chunk)
                            .execute(conn)
                            .await?;
                    }

                    Ok(ReplacedTrace {
                        steps_removed,
                        edges_removed,
                        steps_inserted,
                        edges_inserted,
                    })
                }
                .scope_boxed()
            })
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            steps_removed = replaced.steps_removed,
            steps_inserted = replaced.steps_inserted,
            edges_removed = replaced.edges_removed,
            edges_inserted = replaced.edges_inserted,
            "Graph trace replaced"
        );

        Ok(replaced)
    }

    async fn load_graph_trace(&mut self, graph_id: &str) -> PgResult<GraphTrace> {
        let trace = self
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| {
                async move {
                    let steps = conn.list_graph_steps(graph_id).await?;
                    let edges = conn.list_graph_edges(graph_id).await?;
                    Ok::<_, PgError>(GraphTrace { steps, edges })
                }
                .scope_boxed()
            })
            .await?;

        Ok(trace)
    }

    async fn list_graph_steps(&mut self, trace_graph_id: &str) -> PgResult<Vec<GraphStep>> {
        use schema::graph_steps::dsl::*;

        let steps = graph_steps
            .filter(graph_id.eq(trace_graph_id))
            .select(GraphStep::as_select())
            .order((node_name.asc(), step_index.asc(), id.asc()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(steps)
    }

    async fn list_graph_edges(&mut self, trace_graph_id: &str) -> PgResult<Vec<GraphEdge>> {
        use schema::graph_edges::dsl::*;

        let edges = graph_edges
            .filter(graph_id.eq(trace_graph_id))
            .select(GraphEdge::as_select())
            .order(id.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(edges)
    }
}
