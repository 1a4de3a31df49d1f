//! flake8 linter adapter.

use crate::command::{ConfigFlag, TARGET, Wrapped};
use crate::discovery::FLAKE8_CONFIGS;
use crate::exec::{CommandOutput, CommandSpec, Executor, SystemExecutor};
use crate::types::{Diagnostic, Flake8Options, LintDetails, LintReport, Severity};
use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use snake_config::ToolConfig;
use snake_tools_core::{Tool, ToolContext, ToolError};
use std::path::Path;
use std::sync::Arc;

const FLAKE8: Wrapped = Wrapped {
    name: "flake8",
    configs: FLAKE8_CONFIGS,
    config_flag: ConfigFlag::Joined("--config="),
};

/// `path/to/file.py:12:5: E225 missing whitespace around operator`
#[expect(clippy::expect_used, reason = "static pattern")]
static LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<file>[^:]+):(?P<line>\d+):(?P<col>\d+): (?P<code>[A-Z]+\d+) (?P<msg>.*)$").expect("valid regex"));

/// Runs flake8 against a project directory.
#[derive(Clone)]
pub struct Flake8Tool {
    exec: Arc<dyn Executor>,
    config: ToolConfig,
}

impl Flake8Tool {
    pub fn new(exec: Arc<dyn Executor>, config: ToolConfig) -> Self {
        Self { exec, config }
    }

    /// Full command line for one run against `path`.
    pub fn command(&self, path: &Path, options: &Flake8Options) -> CommandSpec {
        let mut spec = FLAKE8.command(&self.config, path);
        if let Some(n) = options.max_line_length {
            spec.arg(format!("--max-line-length={n}"));
        }
        if !options.select.is_empty() {
            spec.arg(format!("--select={}", options.select.join(",")));
        }
        if !options.ignore.is_empty() {
            spec.arg(format!("--extend-ignore={}", options.ignore.join(",")));
        }
        if !options.exclude.is_empty() {
            spec.arg(format!("--extend-exclude={}", options.exclude.join(",")));
        }
        spec.args(options.args.iter().cloned()).arg(TARGET);
        spec
    }
}

impl Default for Flake8Tool {
    fn default() -> Self {
        Self::new(Arc::new(SystemExecutor), ToolConfig::default())
    }
}

impl Tool for Flake8Tool {
    type Options = Flake8Options;
    type Output = LintReport;
    const NAME: &'static str = "flake8";
    const DESCRIPTION: &'static str = "Run the flake8 linter on a Python project. `path` is the directory flake8 runs from. Returns the issue count, parsed diagnostics (file, line, column, code, message) and the raw output. Lint findings are a successful result with has_issues=true; only a broken flake8 run is an error.";

    fn handle<'a>(
        &'a self,
        _ctx: &'a ToolContext,
        path: &'a Path,
        options: Self::Options,
    ) -> BoxFuture<'a, Result<Self::Output, ToolError>> {
        Box::pin(async move {
            let spec = self.command(path, &options);
            let (output, code) = FLAKE8.run(self.exec.as_ref(), &spec).await?;
            parse_output(path, &output, code)
        })
    }
}

/// Turn a finished flake8 run into a report.
///
/// Exit 0 and 1 are reports; anything higher means flake8 itself failed.
pub fn parse_output(path: &Path, output: &CommandOutput, code: i32) -> Result<LintReport, ToolError> {
    if code > 1 {
        return Err(ToolError::tool_failed("flake8", &output.stderr));
    }

    let stdout = output.stdout.trim();
    let issues_count = stdout.lines().filter(|l| !l.trim().is_empty()).count();
    let issues = stdout.lines().filter_map(parse_line).collect();

    let message = if issues_count == 0 {
        "No issues found".to_string()
    } else {
        format!("Found {issues_count} issues")
    };
    let combined = output.combined();
    let text = if combined.is_empty() {
        "No issues found".to_string()
    } else {
        combined
    };

    Ok(LintReport::new(message, text, path, issues_count, LintDetails { issues }))
}

fn parse_line(line: &str) -> Option<Diagnostic> {
    let caps = LINE_RE.captures(line.trim())?;
    let code = caps["code"].to_string();
    let severity = match code.chars().next() {
        Some('W' | 'C') => Severity::Warning,
        _ => Severity::Error,
    };
    Some(Diagnostic {
        file: caps["file"].trim_start_matches("./").to_string(),
        line: caps["line"].parse().ok()?,
        column: caps["col"].parse().ok(),
        severity,
        code: Some(code),
        message: caps["msg"].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tool() -> Flake8Tool {
        Flake8Tool::new(
            Arc::new(crate::exec::ScriptedExecutor::new()),
            ToolConfig {
                discover_config: false,
                ..ToolConfig::default()
            },
        )
    }

    #[test]
    fn command_flag_order() {
        let tmp = TempDir::new().unwrap();
        let opts = Flake8Options {
            max_line_length: Some(100),
            select: vec!["E".into(), "W".into()],
            ignore: vec!["E203".into()],
            exclude: vec![".venv".into(), "build".into()],
            args: vec!["--statistics".into()],
        };
        assert_eq!(
            tool().command(tmp.path(), &opts).argv(),
            vec![
                "flake8",
                "--max-line-length=100",
                "--select=E,W",
                "--extend-ignore=E203",
                "--extend-exclude=.venv,build",
                "--statistics",
                "."
            ]
        );
    }

    #[test]
    fn clean_run() {
        let report = parse_output(Path::new("/p"), &CommandOutput::new("", "", 0), 0).unwrap();
        assert_eq!(report.message, "No issues found");
        assert_eq!(report.output, "No issues found");
        assert_eq!(report.issues_count, 0);
        assert!(!report.has_issues);
    }

    #[test]
    fn issues_are_counted_and_parsed() {
        let stdout = "./a.py:1:1: F401 'os' imported but unused\n./a.py:3:80: E501 line too long (88 > 79 characters)\n\n";
        let report = parse_output(Path::new("/p"), &CommandOutput::new(stdout, "", 1), 1).unwrap();
        assert_eq!(report.issues_count, 2);
        assert!(report.has_issues);
        assert_eq!(report.message, "Found 2 issues");
        assert_eq!(report.details.issues.len(), 2);

        let first = &report.details.issues[0];
        assert_eq!(first.file, "a.py");
        assert_eq!(first.line, 1);
        assert_eq!(first.column, Some(1));
        assert_eq!(first.code.as_deref(), Some("F401"));
        assert_eq!(first.severity, Severity::Error);
    }

    #[test]
    fn warning_codes() {
        let d = parse_line("b.py:2:1: W291 trailing whitespace").unwrap();
        assert_eq!(d.severity, Severity::Warning);
        assert!(parse_line("not a diagnostic").is_none());
    }

    #[test]
    fn unparsed_lines_still_count() {
        let report = parse_output(Path::new("/p"), &CommandOutput::new("3     E501 line too long\n", "", 1), 1).unwrap();
        assert_eq!(report.issues_count, 1);
        assert!(report.details.issues.is_empty());
    }

    #[test]
    fn high_exit_is_tool_failure() {
        let err = parse_output(Path::new("/p"), &CommandOutput::new("", "Error running flake8", 2), 2).unwrap_err();
        assert_eq!(err.to_string(), "flake8 failed: Error running flake8");
    }
}
