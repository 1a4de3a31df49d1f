//! Configuration types for the snake tool server.
//!
//! The root type is [`SnakeConfig`]. Every struct uses `#[serde(default)]`
//! so partial files work.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Wire names of the tools this server knows about.
pub const KNOWN_TOOLS: [&str; 3] = ["flake8", "mypy", "pytest"];

/// Root configuration, loaded from `snake.json` files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SnakeConfig {
    /// Optional JSON Schema URL for IDE autocomplete support.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Per-tool settings.
    pub tools: ToolsConfig,

    /// MCP server settings.
    pub server: ServerConfig,

    /// Logging and diagnostics configuration.
    pub logging: LoggingConfig,
}

/// Settings for each wrapped tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ToolsConfig {
    pub flake8: ToolConfig,
    pub mypy: MypyConfig,
    pub pytest: ToolConfig,
}

/// Settings shared by all tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable to run instead of the tool's own name (e.g. `.venv/bin/mypy`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,

    /// Arguments inserted before any per-call arguments.
    pub default_args: Vec<String>,

    /// Look for the tool's configuration file at or above the target path.
    pub discover_config: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary: None,
            default_args: vec![],
            discover_config: true,
        }
    }
}

impl ToolConfig {
    /// The configured binary, or `fallback` when none (or a blank one) is set.
    pub fn binary_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.binary
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(fallback)
    }
}

/// mypy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MypyConfig {
    #[serde(flatten)]
    pub common: ToolConfig,

    /// Exclude `tests/` automatically when it exists and no exclusions were requested.
    pub auto_exclude_tests: bool,
}

impl Default for MypyConfig {
    fn default() -> Self {
        Self {
            common: ToolConfig::default(),
            auto_exclude_tests: true,
        }
    }
}

/// How tool results are returned over MCP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Text content only.
    #[default]
    Text,
    /// Text content plus structured content and published output schemas.
    Structured,
}

/// MCP server settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ServerConfig {
    /// Tool names to expose. `None` exposes every tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<Vec<String>>,

    /// Result format.
    pub output: OutputFormat,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    pub level: String,

    /// Whether to enable JSON-formatted logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}
