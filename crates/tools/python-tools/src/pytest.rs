//! pytest runner adapter.

use crate::command::{ConfigFlag, TARGET, Wrapped};
use crate::coverage::parse_coverage;
use crate::discovery::PYTEST_CONFIGS;
use crate::exec::{CommandOutput, CommandSpec, Executor, SystemExecutor};
use crate::types::{PytestOptions, TestDetails, TestReport, TestSummary};
use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use snake_config::ToolConfig;
use snake_tools_core::{Tool, ToolContext, ToolError};
use std::path::Path;
use std::sync::Arc;

const PYTEST: Wrapped = Wrapped {
    name: "pytest",
    configs: PYTEST_CONFIGS,
    config_flag: ConfigFlag::Separate("-c"),
};

/// Final line, e.g. `==== 1 failed, 2 passed in 0.31s ====` or `... in 75.02s (0:01:15) ===`.
#[expect(clippy::expect_used, reason = "static pattern")]
static SUMMARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"=+ (?P<body>.*?) in (?P<secs>[0-9.]+)s(?: \([0-9:]+\))? =+").expect("valid regex"));

#[expect(clippy::expect_used, reason = "static pattern")]
static COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?P<n>\d+) (?P<state>passed|failed|errors?|skipped|xfailed|xpassed)\b").expect("valid regex"));

/// Exit codes that still carry a test report.
///
/// 0 all passed, 1 some failed, 2 interrupted, 5 nothing collected.
/// 3 (internal error) and 4 (usage error) mean pytest itself failed.
const REPORT_EXITS: [i32; 4] = [0, 1, 2, 5];

/// Runs pytest in a project directory.
#[derive(Clone)]
pub struct PytestTool {
    exec: Arc<dyn Executor>,
    config: ToolConfig,
}

impl PytestTool {
    pub fn new(exec: Arc<dyn Executor>, config: ToolConfig) -> Self {
        Self { exec, config }
    }

    /// Full command line for one run against `path`.
    pub fn command(&self, path: &Path, options: &PytestOptions) -> CommandSpec {
        let mut spec = PYTEST.command(&self.config, path);
        if options.verbose {
            spec.arg("-v");
        }
        if options.fail_fast {
            spec.arg("-x");
        }
        if let Some(keyword) = &options.keyword {
            spec.arg("-k").arg(keyword.as_str());
        }
        if let Some(markers) = &options.markers {
            spec.arg("-m").arg(markers.as_str());
        }
        spec.args(options.args.iter().cloned()).arg(TARGET);
        spec
    }
}

impl Default for PytestTool {
    fn default() -> Self {
        Self::new(Arc::new(SystemExecutor), ToolConfig::default())
    }
}

impl Tool for PytestTool {
    type Options = PytestOptions;
    type Output = TestReport;
    const NAME: &'static str = "pytest";
    const DESCRIPTION: &'static str = "Run pytest in a Python project. `path` is the working directory pytest runs from. Returns test counts (total, passed, failed, errors, skipped, xfailed, xpassed), coverage figures when pytest-cov prints a report, and the raw output. Failing tests are a successful result with has_issues=true; only internal or usage errors from pytest are errors.";

    fn handle<'a>(
        &'a self,
        _ctx: &'a ToolContext,
        path: &'a Path,
        options: Self::Options,
    ) -> BoxFuture<'a, Result<Self::Output, ToolError>> {
        Box::pin(async move {
            let spec = self.command(path, &options);
            let (output, code) = PYTEST.run(self.exec.as_ref(), &spec).await?;
            parse_output(path, &output, code)
        })
    }
}

/// Turn a finished pytest run into a report.
pub fn parse_output(path: &Path, output: &CommandOutput, code: i32) -> Result<TestReport, ToolError> {
    if !REPORT_EXITS.contains(&code) {
        return Err(ToolError::tool_failed("pytest", &output.stderr));
    }

    let combined = output.combined();
    let details = TestDetails {
        test_summary: parse_summary(&combined),
        coverage: parse_coverage(&combined),
    };

    let mut issues_count = details.test_summary.failed + details.test_summary.errors;
    if details.coverage.failure.is_some() {
        issues_count += 1;
    }

    let message = match code {
        0 => "All tests passed successfully",
        5 => "No tests were collected",
        _ => "Some tests failed",
    };

    Ok(TestReport::new(message, combined, path, issues_count, details))
}

/// Counts from the last `=== ... in Xs ===` line. Missing or `no tests ran` gives zeros.
pub fn parse_summary(output: &str) -> TestSummary {
    let mut summary = TestSummary::default();
    let Some(caps) = SUMMARY_RE.captures_iter(output).last() else {
        return summary;
    };
    let body = caps["body"].trim();
    if body == "no tests ran" {
        return summary;
    }

    for count in COUNT_RE.captures_iter(body) {
        let Ok(n) = count["n"].parse::<usize>() else {
            continue;
        };
        match &count["state"] {
            "passed" => summary.passed = n,
            "failed" => summary.failed = n,
            "error" | "errors" => summary.errors = n,
            "skipped" => summary.skipped = n,
            "xfailed" => summary.xfailed = n,
            "xpassed" => summary.xpassed = n,
            _ => {}
        }
    }
    summary.total =
        summary.passed + summary.failed + summary.skipped + summary.xfailed + summary.xpassed;
    summary
}
