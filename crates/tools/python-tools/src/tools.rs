//! Registry construction for the Python tools.

use crate::PythonTools;
use snake_tools_core::ToolRegistry;

/// Register `flake8`, `mypy` and `pytest`, sharing one executor and config.
pub fn build_registry(tools: &PythonTools) -> ToolRegistry {
    ToolRegistry::builder()
        .register(tools.flake8_tool())
        .register(tools.mypy_tool())
        .register(tools.pytest_tool())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ScriptedExecutor;
    use snake_config::ToolsConfig;
    use std::sync::Arc;

    #[test]
    fn registers_three_tools() {
        let tools = PythonTools::with_executor(Arc::new(ScriptedExecutor::new()), ToolsConfig::default());
        let registry = build_registry(&tools);
        assert_eq!(registry.list_names(), vec!["flake8", "mypy", "pytest"]);
    }

    #[test]
    fn input_schemas_carry_path_and_options() {
        let tools = PythonTools::with_executor(Arc::new(ScriptedExecutor::new()), ToolsConfig::default());
        let registry = build_registry(&tools);

        let mypy = serde_json::to_value(registry.get("mypy").unwrap().input_schema()).unwrap();
        assert!(mypy["properties"]["path"].is_object());
        assert!(mypy["properties"]["disallow_untyped_defs"].is_object());

        let pytest = serde_json::to_value(registry.get("pytest").unwrap().input_schema()).unwrap();
        assert!(pytest["properties"]["keyword"].is_object());
    }

    #[test]
    fn output_schemas_are_envelopes() {
        let tools = PythonTools::with_executor(Arc::new(ScriptedExecutor::new()), ToolsConfig::default());
        let registry = build_registry(&tools);
        for name in registry.list_names() {
            let schema = registry.get(&name).unwrap().output_schema();
            assert!(schema.is_some(), "{name} has no output schema");
        }
    }
}
