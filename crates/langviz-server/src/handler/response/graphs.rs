//! Graph registry response types.

use jiff::Timestamp;
use langviz_postgres::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifier of a newly registered graph.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartedGraph {
    /// Identifier of the graph.
    pub graph_id: String,
}

impl StartedGraph {
    pub fn from_model(graph: model::Graph) -> Self {
        Self { graph_id: graph.id }
    }
}

/// Most recently registered graph, if any.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestGraph {
    /// Identifier of the graph, `null` when none has been registered.
    pub graph_id: Option<String>,
}

impl LatestGraph {
    pub fn from_model(graph: Option<model::Graph>) -> Self {
        Self {
            graph_id: graph.map(|graph| graph.id),
        }
    }
}

/// Registered graph as listed by `GET /graphs/list`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    /// Identifier of the graph.
    pub id: String,
    /// Display name of the graph.
    pub name: String,
    /// Timestamp when the graph was registered.
    pub created_at: Timestamp,
}

impl GraphSummary {
    pub fn from_model(graph: model::Graph) -> Self {
        Self {
            id: graph.id,
            name: graph.name,
            created_at: graph.created_at.into(),
        }
    }
}

/// Graphs, most recently registered first.
pub type GraphSummaries = Vec<GraphSummary>;
