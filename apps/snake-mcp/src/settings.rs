//! CLI flags resolved against the loaded configuration.

use snake_config::{KNOWN_TOOLS, OutputFormat, SnakeConfig};
use snake_tools_mcp::OutputMode;
use std::collections::BTreeSet;

/// Split a comma-separated tool list. Names are trimmed and lowercased; an
/// empty list yields `None`.
pub fn parse_allow<I, S>(names: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set: BTreeSet<String> = names
        .into_iter()
        .map(|n| n.as_ref().trim().to_ascii_lowercase())
        .filter(|n| !n.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}

/// `--allow` wins over `server.allowlist`.
pub fn resolve_allowlist(cli: Option<&str>, cfg: &SnakeConfig) -> Option<BTreeSet<String>> {
    cli.and_then(|raw| parse_allow(raw.split(',')))
        .or_else(|| cfg.server.allowlist.as_ref().and_then(parse_allow))
}

pub fn unknown_tools(allow: &BTreeSet<String>) -> Vec<&str> {
    allow
        .iter()
        .map(String::as_str)
        .filter(|n| !KNOWN_TOOLS.contains(n))
        .collect()
}

pub fn resolve_output(cli: Option<&str>, configured: OutputFormat) -> OutputMode {
    match (cli, configured) {
        (Some("structured"), _) | (None, OutputFormat::Structured) => OutputMode::Structured,
        _ => OutputMode::Text,
    }
}

/// `--log-level` wins over the configured level (which already includes
/// `SNAKE_LOG_LEVEL`).
pub fn resolve_level<'a>(cli: Option<&'a str>, cfg: &'a SnakeConfig) -> &'a str {
    cli.map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(cfg.logging.level.as_str())
}
