//! Trace snapshot request types.

use std::collections::BTreeMap;

use langviz_postgres::model::{NewGraphEdge, NewGraphStep};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::validations::null_as_empty;

/// One recorded invocation of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepCall {
    /// Global order of the invocation within the run.
    pub step_index: i32,
    /// Input payload, stored as `{}` when missing or null.
    #[serde(default)]
    pub input: Option<Value>,
    /// Output payload, `null` while the node is still running.
    #[serde(default)]
    pub output: Option<Value>,
}

/// A transition between two nodes observed during the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EdgeUsage {
    /// Node the transition starts from.
    pub source: String,
    /// Node the transition leads to.
    pub target: String,
    /// Branch label of a conditional transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_key: Option<String>,
    /// Number of times the transition was taken.
    #[serde(default)]
    pub used_count: Option<i32>,
    /// The producer SDK's spelling of `usedCount`.
    #[serde(default, rename = "used_count", skip_serializing_if = "Option::is_none")]
    pub used_count_snake: Option<i32>,
}

impl EdgeUsage {
    /// Returns the usage count, 0 when absent or `null` under both spellings.
    pub fn count(&self) -> i32 {
        self.used_count.or(self.used_count_snake).unwrap_or_default()
    }
}

/// Full snapshot of a run, replacing whatever was stored before.
///
/// # Example
///
/// ```json
/// {
///   "graphId": "g1",
///   "nodes": {
///     "start": [{ "stepIndex": 0, "input": {}, "output": { "msg": "hi" } }]
///   },
///   "edges": [{ "source": "start", "target": "end", "used_count": 1 }]
/// }
/// ```
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngestTrace {
    /// Identifier of a graph registered with `POST /graph/start`.
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    #[validate(length(min = 1, message = "graphId is missing"))]
    pub graph_id: String,

    /// Invocations grouped by node name.
    #[serde(default)]
    pub nodes: BTreeMap<String, Vec<StepCall>>,

    /// Transitions taken during the run.
    #[serde(default)]
    pub edges: Vec<EdgeUsage>,
}

impl IngestTrace {
    /// Returns the validated identifier.
    #[inline]
    pub fn graph_id(&self) -> &str {
        &self.graph_id
    }

    /// Flattens the snapshot into step and edge rows for `graph_id`.
    pub fn into_models(self, graph_id: &str) -> (Vec<NewGraphStep>, Vec<NewGraphEdge>) {
        let steps = self
            .nodes
            .into_iter()
            .flat_map(|(node_name, calls)| {
                calls.into_iter().map(move |call| {
                    NewGraphStep::new(
                        graph_id,
                        node_name.as_str(),
                        call.step_index,
                        call.input.as_ref(),
                        call.output.as_ref(),
                    )
                })
            })
            .collect();

        let edges = self
            .edges
            .into_iter()
            .map(|edge| NewGraphEdge {
                graph_id: graph_id.to_owned(),
                used_count: edge.count(),
                source_node: edge.source,
                target_node: edge.target,
                condition_key: edge.condition_key,
            })
            .collect();

        (steps, edges)
    }
}
