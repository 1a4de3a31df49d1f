//! Options and report types shared by the Python tool adapters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snake_tools_core::{TextFormat, TextOptions, TextStyle};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

// ============================================================================
// Options
// ============================================================================

/// Options for the flake8 linter.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Flake8Options {
    /// Maximum allowed line length
    pub max_line_length: Option<u32>,
    /// Only report these codes or code prefixes (e.g. ["E", "W6"])
    pub select: Vec<String>,
    /// Codes to ignore on top of the project's own ignore list
    pub ignore: Vec<String>,
    /// Paths or globs to exclude on top of flake8's defaults
    pub exclude: Vec<String>,
    /// Extra arguments passed to flake8 verbatim (e.g. ["--ignore=E203"])
    #[serde(alias = "flake8_args")]
    pub args: Vec<String>,
}

/// Options for the mypy type checker.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MypyOptions {
    /// Report functions without type annotations
    pub disallow_untyped_defs: bool,
    /// Report partially annotated functions
    pub disallow_incomplete_defs: bool,
    /// Enable all optional strictness checks
    pub strict: bool,
    /// Path regexes to exclude. When empty, `tests/` is excluded if present.
    pub exclude: Vec<String>,
    /// Extra arguments passed to mypy verbatim (e.g. ["--no-implicit-optional"])
    #[serde(alias = "mypy_args")]
    pub args: Vec<String>,
}

/// Options for the pytest runner.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PytestOptions {
    /// Verbose test output (-v)
    pub verbose: bool,
    /// Stop at the first failure (-x)
    pub fail_fast: bool,
    /// Only run tests matching this keyword expression (-k)
    pub keyword: Option<String>,
    /// Only run tests matching this marker expression (-m)
    pub markers: Option<String>,
    /// Extra arguments passed to pytest verbatim (e.g. ["--cov=src"])
    #[serde(alias = "pytest_args")]
    pub args: Vec<String>,
}

// ============================================================================
// Reports
// ============================================================================

/// The `data` of a successful envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckReport<D> {
    /// One-line summary
    pub message: String,
    /// Combined tool output
    pub output: String,
    /// Directory the tool ran in
    pub project_path: String,
    pub issues_count: usize,
    pub has_issues: bool,
    #[serde(flatten)]
    pub details: D,
}

impl<D> CheckReport<D> {
    pub fn new(
        message: impl Into<String>,
        output: impl Into<String>,
        project_path: &Path,
        issues_count: usize,
        details: D,
    ) -> Self {
        Self {
            message: message.into(),
            output: output.into(),
            project_path: project_path.display().to_string(),
            issues_count,
            has_issues: issues_count > 0,
            details,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// One finding reported by a linter or type checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub severity: Severity,
    /// Tool-specific code, e.g. `E501` or `arg-type`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

/// Details for flake8 and mypy reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LintDetails {
    /// Parsed diagnostics; lines that do not parse are only in `output`
    pub issues: Vec<Diagnostic>,
}

/// Counts from pytest's final summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub xfailed: usize,
    pub xpassed: usize,
}

/// Coverage figures from a pytest-cov terminal report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coverage {
    /// Percentage from the TOTAL row
    pub total: f64,
    /// Percentage per file
    pub by_file: BTreeMap<String, f64>,
    /// The `FAIL Required test coverage ...` line, when coverage was below the threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// Details for pytest reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestDetails {
    pub test_summary: TestSummary,
    pub coverage: Coverage,
}

pub type LintReport = CheckReport<LintDetails>;
pub type TestReport = CheckReport<TestDetails>;

// ============================================================================
// Text formatting
// ============================================================================

impl<D: TextFormat> TextFormat for CheckReport<D> {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        let mut blocks = Vec::new();
        if opts.style == TextStyle::Humanized {
            blocks.push(format!("{} ({})", self.message, self.project_path));
        } else {
            blocks.push(self.message.clone());
        }
        let details = self.details.fmt_text(opts);
        if !details.is_empty() {
            blocks.push(details);
        }
        if !self.output.is_empty() && self.output != self.message {
            blocks.push(self.output.clone());
        }
        blocks.join("\n\n")
    }
}

impl TextFormat for LintDetails {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        // The raw output already lists every issue; only summarize when truncating.
        match opts.max_items {
            Some(max) if self.issues.len() > max => {
                let mut out = String::new();
                for d in self.issues.iter().take(max) {
                    let _ = writeln!(out, "{}:{}: {}", d.file, d.line, d.message);
                }
                let _ = write!(out, "... {} more", self.issues.len() - max);
                out
            }
            _ => String::new(),
        }
    }
}

impl TextFormat for TestDetails {
    fn fmt_text(&self, _opts: &TextOptions) -> String {
        let s = &self.test_summary;
        let mut out = format!(
            "{} total: {} passed, {} failed, {} errors, {} skipped, {} xfailed, {} xpassed",
            s.total, s.passed, s.failed, s.errors, s.skipped, s.xfailed, s.xpassed
        );
        if self.coverage.total > 0.0 || !self.coverage.by_file.is_empty() {
            let _ = write!(out, "\nCoverage: {}%", self.coverage.total);
        }
        if let Some(failure) = &self.coverage.failure {
            let _ = write!(out, "\n{failure}");
        }
        out
    }
}
