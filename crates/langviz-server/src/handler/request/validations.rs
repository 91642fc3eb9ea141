//! Deserialization helpers shared by request types.

use serde::{Deserialize, Deserializer};

/// Reads a string field where `null` counts as absent.
///
/// Combined with `#[serde(default)]` this turns a missing or `null`
/// identifier into an empty string, so a single `length(min = 1)` rule
/// reports it with the field's own message.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(default, deserialize_with = "null_as_empty")]
        value: String,
    }

    #[test]
    fn null_and_missing_become_empty() -> anyhow::Result<()> {
        let null: Wrapper = serde_json::from_value(json!({ "value": null }))?;
        let missing: Wrapper = serde_json::from_value(json!({}))?;
        let present: Wrapper = serde_json::from_value(json!({ "value": "g1" }))?;

        assert_eq!(null.value, "");
        assert_eq!(missing.value, "");
        assert_eq!(present.value, "g1");
        Ok(())
    }
}
