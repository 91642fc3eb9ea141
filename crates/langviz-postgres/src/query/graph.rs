//! Graph repository for registering and listing traced runs.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Graph, NewGraph};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for graph registry operations.
pub trait GraphRepository {
    /// Registers a new graph.
    ///
    /// Fails with a unique violation on `graphs_pkey` if the id is taken.
    fn create_graph(&mut self, new_graph: NewGraph)
    -> impl Future<Output = PgResult<Graph>> + Send;

    /// Finds a graph by its identifier.
    fn find_graph_by_id(
        &mut self,
        graph_id: &str,
    ) -> impl Future<Output = PgResult<Option<Graph>>> + Send;

    /// Lists every graph, most recently created first.
    fn list_graphs(&mut self) -> impl Future<Output = PgResult<Vec<Graph>>> + Send;

    /// Returns the most recently created graph, if any.
    fn find_latest_graph(&mut self) -> impl Future<Output = PgResult<Option<Graph>>> + Send;

    /// Deletes a graph together with its steps and edges.
    ///
    /// Returns `false` if no graph had the identifier.
    fn delete_graph(&mut self, graph_id: &str) -> impl Future<Output = PgResult<bool>> + Send;
}

impl GraphRepository for PgConnection {
    async fn create_graph(&mut self, new_graph: NewGraph) -> PgResult<Graph> {
        use schema::graphs;

        let graph = diesel::insert_into(graphs::table)
            .values(&new_graph)
            .returning(Graph::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, graph_id = %graph.id, "Graph created");
        Ok(graph)
    }

    async fn find_graph_by_id(&mut self, graph_id: &str) -> PgResult<Option<Graph>> {
        use schema::graphs::dsl::*;

        let graph = graphs
            .filter(id.eq(graph_id))
            .select(Graph::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(graph)
    }

    async fn list_graphs(&mut self) -> PgResult<Vec<Graph>> {
        use schema::graphs::dsl::*;

        let all = graphs
            .select(Graph::as_select())
            .order((created_at.desc(), id.asc()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(all)
    }

    async fn find_latest_graph(&mut self) -> PgResult<Option<Graph>> {
        use schema::graphs::dsl::*;

        let graph = graphs
            .select(Graph::as_select())
            .order((created_at.desc(), id.asc()))
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(graph)
    }

    async fn delete_graph(&mut self, graph_id: &str) -> PgResult<bool> {
        use schema::graphs::dsl::*;

        let deleted = diesel::delete(graphs.filter(id.eq(graph_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, graph_id, deleted, "Graph deleted");
        Ok(deleted > 0)
    }
}
