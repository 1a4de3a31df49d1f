//! mypy type checker adapter.

use crate::command::{ConfigFlag, TARGET, Wrapped};
use crate::discovery::MYPY_CONFIGS;
use crate::exec::{CommandOutput, CommandSpec, Executor, SystemExecutor};
use crate::types::{Diagnostic, LintDetails, LintReport, MypyOptions, Severity};
use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use snake_config::MypyConfig;
use snake_tools_core::{Tool, ToolContext, ToolError};
use std::path::Path;
use std::sync::Arc;

const MYPY: Wrapped = Wrapped {
    name: "mypy",
    configs: MYPY_CONFIGS,
    config_flag: ConfigFlag::Separate("--config-file"),
};

/// `pkg/mod.py:10:5: error: Incompatible return value type  [return-value]`,
/// optionally with `:end_line:end_col` after the column (`--show-error-end`).
#[expect(clippy::expect_used, reason = "static pattern")]
static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<file>[^:]+):(?P<line>\d+):(?:(?P<col>\d+):(?:\d+:\d+:)?)? (?P<sev>error|warning|note): (?P<msg>.*?)(?:\s+\[(?P<code>[a-z0-9-]+)\])?$",
    )
    .expect("valid regex")
});

/// Runs mypy against a project directory.
#[derive(Clone)]
pub struct MypyTool {
    exec: Arc<dyn Executor>,
    config: MypyConfig,
}

impl MypyTool {
    pub fn new(exec: Arc<dyn Executor>, config: MypyConfig) -> Self {
        Self { exec, config }
    }

    /// Full command line for one run against `path`.
    pub fn command(&self, path: &Path, options: &MypyOptions) -> CommandSpec {
        let mut spec = MYPY.command(&self.config.common, path);
        if options.disallow_untyped_defs {
            spec.arg("--disallow-untyped-defs");
        }
        if options.disallow_incomplete_defs {
            spec.arg("--disallow-incomplete-defs");
        }
        if options.strict {
            spec.arg("--strict");
        }
        spec.args(self.exclusions(path, options));
        spec.args(options.args.iter().cloned()).arg(TARGET);
        spec
    }

    fn exclusions(&self, path: &Path, options: &MypyOptions) -> Vec<String> {
        if !options.exclude.is_empty() {
            return options
                .exclude
                .iter()
                .map(|p| format!("--exclude={p}"))
                .collect();
        }
        if self.config.auto_exclude_tests && path.join("tests").is_dir() {
            return vec!["--exclude=tests/".to_string()];
        }
        vec![]
    }
}

impl Default for MypyTool {
    fn default() -> Self {
        Self::new(Arc::new(SystemExecutor), MypyConfig::default())
    }
}

impl Tool for MypyTool {
    type Options = MypyOptions;
    type Output = LintReport;
    const NAME: &'static str = "mypy";
    const DESCRIPTION: &'static str = "Run the mypy type checker on a Python project. `path` is the directory mypy runs from; a `tests/` directory there is excluded unless `exclude` is given. Returns the number of type errors, parsed diagnostics and the raw output. Type errors are a successful result with has_issues=true; only a broken mypy run is an error.";

    fn handle<'a>(
        &'a self,
        _ctx: &'a ToolContext,
        path: &'a Path,
        options: Self::Options,
    ) -> BoxFuture<'a, Result<Self::Output, ToolError>> {
        Box::pin(async move {
            let spec = self.command(path, &options);
            let (output, code) = MYPY.run(self.exec.as_ref(), &spec).await?;
            parse_output(path, &output, code)
        })
    }
}

/// Turn a finished mypy run into a report.
///
/// Exit 0 and 1 are reports; anything higher means mypy itself failed.
/// Only `error:` diagnostics count as issues. Notes are kept in `issues`
/// alongside them for context. An exit 1 whose lines do not parse still
/// reports issues, counted from the non-summary stdout lines.
pub fn parse_output(path: &Path, output: &CommandOutput, code: i32) -> Result<LintReport, ToolError> {
    if code > 1 {
        return Err(ToolError::tool_failed("mypy", &output.stderr));
    }

    let issues: Vec<Diagnostic> = output.stdout.lines().filter_map(parse_line).collect();
    let mut issues_count = issues
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if code == 1 && issues_count == 0 {
        issues_count = unparsed_error_lines(&output.stdout).max(1);
    }

    let message = if issues_count == 0 {
        "No issues found".to_string()
    } else {
        format!("Found {issues_count} type issues")
    };
    let text = if code == 0 && issues_count == 0 {
        "No issues found".to_string()
    } else {
        output.combined()
    };

    Ok(LintReport::new(message, text, path, issues_count, LintDetails { issues }))
}

/// Lines other than the `Found N errors` / `Success:` summary and notes.
fn unparsed_error_lines(stdout: &str) -> usize {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| !l.starts_with("Found ") && !l.starts_with("Success:"))
        .filter(|l| !l.contains(": note: "))
        .count()
}

fn parse_line(line: &str) -> Option<Diagnostic> {
    let caps = LINE_RE.captures(line.trim_end())?;
    let severity = match &caps["sev"] {
        "error" => Severity::Error,
        "warning" => Severity::Warning,
        _ => Severity::Note,
    };
    Some(Diagnostic {
        file: caps["file"].to_string(),
        line: caps["line"].parse().ok()?,
        column: caps.name("col").and_then(|m| m.as_str().parse().ok()),
        severity,
        code: caps.name("code").map(|m| m.as_str().to_string()),
        message: caps["msg"].to_string(),
    })
}
