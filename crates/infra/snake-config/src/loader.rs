//! Configuration loader: layered JSON files plus env overrides.
//!
//! Layers, lowest precedence first:
//! 1. struct defaults
//! 2. global `~/.config/snake/snake.json`
//! 3. local `./snake.json`
//! 4. an explicit file (`--config`)
//! 5. environment variables

use crate::{merge::merge_patch, types::SnakeConfig, validation::AdvisoryWarning};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Filename for local config.
pub const LOCAL_FILE: &str = "snake.json";

/// Directory name under the user config dir for global config.
pub const GLOBAL_DIR: &str = "snake";

/// Filename for global config.
pub const GLOBAL_FILE: &str = "snake.json";

/// Resolved paths for config files.
#[derive(Debug, Clone)]
pub struct SnakeConfigPaths {
    /// Path to local config (`./snake.json`).
    pub local: PathBuf,

    /// Path to global config, if a config dir could be determined.
    pub global: Option<PathBuf>,

    /// Explicit file passed by the caller.
    pub explicit: Option<PathBuf>,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct LoadedSnakeConfig {
    /// The loaded and merged configuration.
    pub config: SnakeConfig,

    /// Advisory warnings from validation.
    pub warnings: Vec<AdvisoryWarning>,

    /// Resolved config file paths.
    pub paths: SnakeConfigPaths,
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(GLOBAL_DIR).join(GLOBAL_FILE))
}

/// Get the local config file path for a given directory.
pub fn local_config_path(local_dir: &Path) -> PathBuf {
    local_dir.join(LOCAL_FILE)
}

/// Load global + local configuration for `local_dir`.
pub fn load_merged(local_dir: &Path) -> Result<LoadedSnakeConfig> {
    load_layers(global_config_path(), local_dir, None)
}

/// Load global + local configuration, then an explicit file on top.
///
/// Unlike the implicit layers, the explicit file must exist.
pub fn load_with_explicit(local_dir: &Path, explicit: &Path) -> Result<LoadedSnakeConfig> {
    if !explicit.exists() {
        anyhow::bail!("Config file not found: {}", explicit.display());
    }
    load_layers(global_config_path(), local_dir, Some(explicit))
}

fn load_layers(
    global: Option<PathBuf>,
    local_dir: &Path,
    explicit: Option<&Path>,
) -> Result<LoadedSnakeConfig> {
    let local = local_config_path(local_dir);

    let mut merged = Value::Object(Default::default());
    for layer in global.iter().map(PathBuf::as_path).chain([local.as_path()]).chain(explicit) {
        let patch = read_json_object_or_empty(layer)?;
        merged = merge_patch(merged, patch);
    }

    let mut config: SnakeConfig =
        serde_json::from_value(merged).context("Failed to deserialize merged snake config")?;
    apply_env_overrides(&mut config);

    let warnings = crate::validation::validate(&config);
    for warning in &warnings {
        tracing::warn!(code = warning.code, "{}", warning);
    }

    Ok(LoadedSnakeConfig {
        config,
        warnings,
        paths: SnakeConfigPaths {
            local,
            global,
            explicit: explicit.map(Path::to_path_buf),
        },
    })
}

/// Apply environment variable overrides to the config.
fn apply_env_overrides(cfg: &mut SnakeConfig) {
    if let Some(v) = env_trimmed("SNAKE_FLAKE8_BIN") {
        cfg.tools.flake8.binary = Some(v);
    }
    if let Some(v) = env_trimmed("SNAKE_MYPY_BIN") {
        cfg.tools.mypy.common.binary = Some(v);
    }
    if let Some(v) = env_trimmed("SNAKE_PYTEST_BIN") {
        cfg.tools.pytest.binary = Some(v);
    }
    if let Some(v) = env_trimmed("SNAKE_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = env_trimmed("SNAKE_LOG_JSON") {
        cfg.logging.json = v.eq_ignore_ascii_case("true") || v == "1";
    }
}

/// Read an env var, trimmed, ignoring blank values.
fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a JSON file as a Value, returning an empty object if the file doesn't exist.
fn read_json_object_or_empty(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Default::default()));
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let v: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    match v {
        Value::Object(_) => Ok(v),
        _ => anyhow::bail!("Config root must be a JSON object: {}", path.display()),
    }
}
