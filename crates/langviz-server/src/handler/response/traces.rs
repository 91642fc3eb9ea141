//! Trace snapshot response types.
//!
//! [`TraceSnapshot`] rebuilds the ingestion shape from stored rows: one
//! entry per node holding its calls in step order, plus the edge list.

use std::collections::BTreeMap;

use langviz_postgres::model::{GraphEdge, GraphStep};
use langviz_postgres::query::GraphTrace;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tracing target for trace reconstruction.
const TRACING_TARGET: &str = "langviz_server::handler::traces";

/// Acknowledgement of an accepted snapshot.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IngestStatus {
    /// Always `ok`.
    pub status: String,
}

impl Default for IngestStatus {
    fn default() -> Self {
        Self {
            status: "ok".to_owned(),
        }
    }
}

/// One stored invocation of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    /// Global order of the invocation within the run.
    pub step_index: i32,
    /// Input payload.
    pub input: Value,
    /// Output payload.
    pub output: Value,
}

impl StepRecord {
    /// Parses the stored payloads, substituting `{}` for unparseable text.
    pub fn from_model(step: &GraphStep) -> Self {
        Self {
            step_index: step.step_index,
            input: parse_payload(step, "input", step.input()),
            output: parse_payload(step, "output", step.output()),
        }
    }
}

fn parse_payload(step: &GraphStep, field: &str, parsed: serde_json::Result<Value>) -> Value {
    parsed.unwrap_or_else(|error| {
        tracing::warn!(
            target: TRACING_TARGET,
            graph_id = %step.graph_id,
            node_name = %step.node_name,
            step_index = step.step_index,
            field,
            error = %error,
            "stored payload is not valid JSON, substituting an empty object"
        );
        Value::Object(serde_json::Map::new())
    })
}

/// One stored transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    /// Node the transition starts from.
    pub source: String,
    /// Node the transition leads to.
    pub target: String,
    /// Branch label, omitted for unconditional transitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_key: Option<String>,
    /// Number of times the transition was taken.
    ///
    /// Keeps the producer's snake_case key, unlike the other fields.
    #[serde(rename = "used_count")]
    pub used_count: i32,
}

impl EdgeRecord {
    pub fn from_model(edge: GraphEdge) -> Self {
        Self {
            used_count: edge.used_count_or_default(),
            source: edge.source_node,
            target: edge.target_node,
            condition_key: edge.condition_key,
        }
    }
}

/// Reconstructed run, in the same shape the producer ingests.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TraceSnapshot {
    /// Calls grouped by node name, each list ordered by step index.
    pub nodes: BTreeMap<String, Vec<StepRecord>>,
    /// Transitions taken during the run.
    pub edges: Vec<EdgeRecord>,
}

impl TraceSnapshot {
    pub fn from_trace(trace: GraphTrace) -> Self {
        let mut nodes: BTreeMap<String, Vec<StepRecord>> = BTreeMap::new();
        for step in &trace.steps {
            let record = StepRecord::from_model(step);
            match nodes.get_mut(&step.node_name) {
                Some(calls) => calls.push(record),
                None => {
                    nodes.insert(step.node_name.clone(), vec![record]);
                }
            }
        }

        // Stable, so equal indices keep their storage order.
        for calls in nodes.values_mut() {
            calls.sort_by_key(|call| call.step_index);
        }

        let edges = trace.edges.into_iter().map(EdgeRecord::from_model).collect();
        Self { nodes, edges }
    }

    /// Number of stored invocations across all nodes.
    pub fn step_count(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn step(id: i64, node_name: &str, step_index: i32, input: &str, output: &str) -> GraphStep {
        GraphStep {
            id,
            graph_id: "g1".to_owned(),
            node_name: node_name.to_owned(),
            step_index,
            input_json: input.to_owned(),
            output_json: output.to_owned(),
        }
    }

    fn edge(id: i64, condition_key: Option<&str>, used_count: Option<i32>) -> GraphEdge {
        GraphEdge {
            id,
            graph_id: "g1".to_owned(),
            source_node: "start".to_owned(),
            target_node: "end".to_owned(),
            condition_key: condition_key.map(str::to_owned),
            used_count,
        }
    }

    #[test]
    fn empty_trace_is_empty_snapshot() -> anyhow::Result<()> {
        let snapshot = TraceSnapshot::from_trace(GraphTrace::default());
        assert_eq!(serde_json::to_value(&snapshot)?, json!({ "nodes": {}, "edges": [] }));
        Ok(())
    }

    #[test]
    fn steps_are_grouped_and_sorted_stably() {
        let trace = GraphTrace {
            steps: vec![
                step(1, "agent", 4, r#"{"n":1}"#, "{}"),
                step(2, "tool", 1, "{}", "{}"),
                step(3, "agent", 0, r#"{"n":2}"#, "{}"),
                step(4, "agent", 4, r#"{"n":3}"#, "{}"),
            ],
            edges: Vec::new(),
        };

        let snapshot = TraceSnapshot::from_trace(trace);
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.step_count(), 4);

        let agent = &snapshot.nodes["agent"];
        let order: Vec<_> = agent.iter().map(|c| (c.step_index, c.input["n"].clone())).collect();
        assert_eq!(order, [(0, json!(2)), (4, json!(1)), (4, json!(3))]);
    }

    #[test]
    fn unparseable_payload_becomes_empty_object() {
        let trace = GraphTrace {
            steps: vec![step(1, "agent", 0, "not json", r#"{"ok":true}"#)],
            edges: Vec::new(),
        };

        let snapshot = TraceSnapshot::from_trace(trace);
        let call = &snapshot.nodes["agent"][0];
        assert_eq!(call.input, json!({}));
        assert_eq!(call.output, json!({ "ok": true }));
    }

    #[test]
    fn edges_omit_missing_condition_and_default_count() -> anyhow::Result<()> {
        let trace = GraphTrace {
            steps: Vec::new(),
            edges: vec![edge(1, None, None), edge(2, Some("__end__"), Some(2))],
        };

        let value = serde_json::to_value(TraceSnapshot::from_trace(trace))?;
        assert_eq!(
            value["edges"],
            json!([
                { "source": "start", "target": "end", "used_count": 0 },
                { "source": "start", "target": "end", "conditionKey": "__end__", "used_count": 2 }
            ])
        );
        Ok(())
    }

    #[test]
    fn load_matches_ingested_example() -> anyhow::Result<()> {
        let trace = GraphTrace {
            steps: vec![step(1, "start", 0, "{}", r#"{"msg":"hi"}"#)],
            edges: vec![edge(1, None, Some(1))],
        };

        let value = serde_json::to_value(TraceSnapshot::from_trace(trace))?;
        assert_eq!(
            value,
            json!({
                "nodes": { "start": [{ "stepIndex": 0, "input": {}, "output": { "msg": "hi" } }] },
                "edges": [{ "source": "start", "target": "end", "used_count": 1 }]
            })
        );
        Ok(())
    }
}
