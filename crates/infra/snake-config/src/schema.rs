//! JSON Schema for `snake.json`, for editor autocomplete.

use crate::types::SnakeConfig;
use schemars::{Schema, generate::SchemaSettings};

/// Generate the JSON Schema for [`SnakeConfig`].
pub fn schema() -> Schema {
    SchemaSettings::default()
        .into_generator()
        .into_root_schema_for::<SnakeConfig>()
}

/// Generate the JSON Schema as a pretty-printed JSON string.
pub fn schema_json_pretty() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&schema())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> jsonschema::Validator {
        jsonschema::validator_for(&serde_json::to_value(schema()).unwrap()).unwrap()
    }

    #[test]
    fn schema_is_valid_json() {
        let json = schema_json_pretty().unwrap();
        let _: serde_json::Value = serde_json::from_str(&json).unwrap();
    }

    #[test]
    fn schema_names_tool_sections() {
        let json = schema_json_pretty().unwrap();
        assert!(json.contains("\"auto_exclude_tests\""));
        assert!(json.contains("\"discover_config\""));
        assert!(json.contains("\"allowlist\""));
    }

    #[test]
    fn default_config_validates() {
        let config_json = serde_json::to_value(SnakeConfig::default()).unwrap();
        let result = validator().validate(&config_json);
        assert!(result.is_ok(), "{:?}", result.err());
    }

    #[test]
    fn partial_config_validates() {
        let config_json = serde_json::json!({
            "tools": {"mypy": {"binary": ".venv/bin/mypy", "auto_exclude_tests": false}},
            "server": {"output": "structured"}
        });
        let result = validator().validate(&config_json);
        assert!(result.is_ok(), "{:?}", result.err());
    }

    #[test]
    fn bad_output_format_is_rejected() {
        let config_json = serde_json::json!({"server": {"output": "xml"}});
        assert!(validator().validate(&config_json).is_err());
    }
}
