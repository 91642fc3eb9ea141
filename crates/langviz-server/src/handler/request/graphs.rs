//! Graph registry request types.

use langviz_postgres::model::NewGraph;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::null_as_empty;

/// Request payload for registering a traced run.
///
/// # Example
///
/// ```json
/// {
///   "graphId": "7f0c2c1e-run",
///   "name": "Support agent"
/// }
/// ```
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartGraph {
    /// Producer-generated identifier of the run.
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    #[validate(length(min = 1, message = "graphId is missing"))]
    pub graph_id: String,

    /// Display name, "Untitled" when omitted or blank.
    #[validate(length(max = 255))]
    pub name: Option<String>,
}

impl StartGraph {
    /// Converts this request into a [`NewGraph`] model.
    pub fn into_model(self) -> NewGraph {
        NewGraph::new(self.graph_id, self.name)
    }
}

/// Query parameters addressing a single graph.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GraphQuery {
    /// Identifier of the graph.
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "String")]
    #[validate(length(min = 1, message = "graphId is missing"))]
    pub graph_id: String,
}

impl GraphQuery {
    /// Returns the validated identifier.
    #[inline]
    pub fn graph_id(&self) -> &str {
        &self.graph_id
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use validator::ValidationErrors;

    use super::*;

    fn graph_id_message(errors: &ValidationErrors) -> Option<String> {
        let field_errors = errors.field_errors();
        let error = field_errors.get("graph_id")?.first()?;
        error.message.as_ref().map(ToString::to_string)
    }

    #[test]
    fn missing_null_or_empty_graph_id_is_reported() -> anyhow::Result<()> {
        for body in [json!({ "name": "x" }), json!({ "graphId": null }), json!({ "graphId": "" })] {
            let request: StartGraph = serde_json::from_value(body)?;
            let Err(errors) = request.validate() else {
                panic!("request without graphId should be invalid");
            };
            assert_eq!(graph_id_message(&errors).as_deref(), Some("graphId is missing"));
        }
        Ok(())
    }

    #[test]
    fn query_without_graph_id_is_reported() {
        let Err(errors) = GraphQuery::default().validate() else {
            panic!("query without graphId should be invalid");
        };
        assert_eq!(graph_id_message(&errors).as_deref(), Some("graphId is missing"));
    }

    #[test]
    fn blank_name_becomes_untitled() -> anyhow::Result<()> {
        let request: StartGraph = serde_json::from_str(r#"{"graphId":"g1","name":"  "}"#)?;
        assert!(request.validate().is_ok());

        let model = request.into_model();
        assert_eq!(model.id, "g1");
        assert_eq!(model.effective_name(), "Untitled");
        Ok(())
    }

    #[test]
    fn overlong_name_fails_validation() {
        let request = StartGraph {
            graph_id: "g1".to_owned(),
            name: Some("n".repeat(256)),
        };
        assert!(request.validate().is_err());
    }
}
