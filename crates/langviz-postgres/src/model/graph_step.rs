//! Graph step model for PostgreSQL database operations.

use diesel::prelude::*;

use crate::schema::graph_steps;

/// Serialized payload stored when a step has no input or output yet.
pub const EMPTY_PAYLOAD: &str = "{}";

/// One recorded invocation of a named node.
///
/// A node may have several steps; together they form its call history.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = graph_steps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GraphStep {
    /// Surrogate identifier.
    pub id: i64,
    /// Graph this step belongs to.
    pub graph_id: String,
    /// Name of the invoked node.
    pub node_name: String,
    /// Caller-assigned position used for ordering.
    pub step_index: i32,
    /// Serialized input payload.
    pub input_json: String,
    /// Serialized output payload.
    pub output_json: String,
}

impl GraphStep {
    /// Parses the stored input payload.
    pub fn input(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.input_json)
    }

    /// Parses the stored output payload.
    pub fn output(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.output_json)
    }
}

/// Data for recording a step.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = graph_steps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewGraphStep {
    /// Graph this step belongs to.
    pub graph_id: String,
    /// Name of the invoked node.
    pub node_name: String,
    /// Caller-assigned position used for ordering.
    pub step_index: i32,
    /// Serialized input payload.
    pub input_json: String,
    /// Serialized output payload.
    pub output_json: String,
}

impl NewGraphStep {
    /// Creates a step record, serializing the payloads.
    ///
    /// Missing and `null` payloads are stored as an empty object.
    pub fn new(
        graph_id: impl Into<String>,
        node_name: impl Into<String>,
        step_index: i32,
        input: Option<&serde_json::Value>,
        output: Option<&serde_json::Value>,
    ) -> Self {
        Self {
            graph_id: graph_id.into(),
            node_name: node_name.into(),
            step_index,
            input_json: serialize_payload(input),
            output_json: serialize_payload(output),
        }
    }
}

fn serialize_payload(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => EMPTY_PAYLOAD.to_owned(),
        Some(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_and_missing_payloads_become_empty_objects() {
        let step = NewGraphStep::new("g1", "agent", 0, None, Some(&serde_json::Value::Null));
        assert_eq!(step.input_json, "{}");
        assert_eq!(step.output_json, "{}");
    }

    #[test]
    fn payloads_are_serialized_verbatim() -> anyhow::Result<()> {
        let input = json!({ "messages": ["hi"], "depth": 2 });
        let step = NewGraphStep::new("g1", "agent", 3, Some(&input), Some(&json!("done")));

        assert_eq!(serde_json::from_str::<serde_json::Value>(&step.input_json)?, input);
        assert_eq!(step.output_json, "\"done\"");
        Ok(())
    }

    #[test]
    fn stored_payloads_parse_back() {
        let step = GraphStep {
            id: 1,
            graph_id: "g1".to_owned(),
            node_name: "agent".to_owned(),
            step_index: 0,
            input_json: "{\"a\":1}".to_owned(),
            output_json: "not json".to_owned(),
        };

        assert_eq!(step.input().ok(), Some(json!({ "a": 1 })));
        assert!(step.output().is_err());
    }
}
