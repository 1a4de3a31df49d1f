//! Advisory validation for [`SnakeConfig`].
//!
//! Warnings never block startup. The server logs them and carries on.

use crate::types::{KNOWN_TOOLS, SnakeConfig, ToolConfig};

/// An advisory warning about a configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryWarning {
    /// Machine-readable warning code.
    pub code: &'static str,

    /// Human-readable warning message.
    pub message: String,

    /// JSON path to the problematic config field.
    pub path: &'static str,
}

impl std::fmt::Display for AdvisoryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a configuration and return advisory warnings.
pub fn validate(cfg: &SnakeConfig) -> Vec<AdvisoryWarning> {
    let mut warnings = vec![];

    if let Some(allowlist) = &cfg.server.allowlist {
        for name in allowlist {
            if !KNOWN_TOOLS.contains(&name.trim()) {
                warnings.push(AdvisoryWarning {
                    code: "server.allowlist.unknown",
                    path: "server.allowlist",
                    message: format!(
                        "Unknown tool '{name}'. Expected one of: {}",
                        KNOWN_TOOLS.join(", ")
                    ),
                });
            }
        }
    }

    check_binary(&cfg.tools.flake8, "tools.flake8.binary", &mut warnings);
    check_binary(&cfg.tools.mypy.common, "tools.mypy.binary", &mut warnings);
    check_binary(&cfg.tools.pytest, "tools.pytest.binary", &mut warnings);

    if !VALID_LEVELS.contains(&cfg.logging.level.to_lowercase().as_str()) {
        warnings.push(AdvisoryWarning {
            code: "logging.level.invalid",
            path: "logging.level",
            message: format!(
                "Unknown log level '{}'. Expected one of: {}",
                cfg.logging.level,
                VALID_LEVELS.join(", ")
            ),
        });
    }

    warnings
}

fn check_binary(tool: &ToolConfig, path: &'static str, warnings: &mut Vec<AdvisoryWarning>) {
    if tool.binary.as_deref().is_some_and(|b| b.trim().is_empty()) {
        warnings.push(AdvisoryWarning {
            code: "tools.binary.empty",
            path,
            message: "binary is blank; the default executable name is used".into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_warnings() {
        assert!(validate(&SnakeConfig::default()).is_empty());
    }

    #[test]
    fn unknown_allowlist_entry_warns() {
        let mut cfg = SnakeConfig::default();
        cfg.server.allowlist = Some(vec!["mypy".into(), "black".into()]);
        let warnings = validate(&cfg);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "server.allowlist.unknown");
        assert!(warnings[0].message.contains("'black'"));
    }

    #[test]
    fn blank_binary_warns() {
        let mut cfg = SnakeConfig::default();
        cfg.tools.pytest.binary = Some("  ".into());
        let warnings = validate(&cfg);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "tools.pytest.binary");
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut cfg = SnakeConfig::default();
        cfg.logging.level = "DEBUG".into();
        assert!(validate(&cfg).is_empty());
        cfg.logging.level = "verbose".into();
        assert_eq!(validate(&cfg)[0].code, "logging.level.invalid");
    }

    #[test]
    fn display_format() {
        let w = AdvisoryWarning {
            code: "logging.level.invalid",
            path: "logging.level",
            message: "bad".into(),
        };
        assert_eq!(w.to_string(), "[logging.level.invalid] logging.level: bad");
    }
}
