//! End-to-end runs of the three tools through the function-call surface,
//! with subprocesses replaced by a scripted executor.

use python_tools::types::{Flake8Options, MypyOptions, PytestOptions};
use python_tools::{CommandOutput, PythonTools, ScriptedExecutor, build_registry};
use snake_config::ToolsConfig;
use snake_tools_core::ToolContext;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn setup() -> (TempDir, Arc<ScriptedExecutor>, PythonTools) {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join("sample.py"), "def add(a, b):\n    return a + b\n").unwrap();
    let exec = Arc::new(ScriptedExecutor::new());
    let tools = PythonTools::with_executor(Arc::<ScriptedExecutor>::clone(&exec), ToolsConfig::default());
    (project, exec, tools)
}

fn path_str(dir: &Path) -> String {
    dir.to_string_lossy().to_string()
}

// ---------------------------------------------------------------------------
// flake8
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flake8_no_issues() {
    let (project, exec, tools) = setup();
    exec.push(CommandOutput::new("", "", 0));

    let env = tools
        .flake8(ToolContext::new(), path_str(project.path()), Flake8Options::default())
        .await;
    let report = env.into_result().unwrap();
    assert_eq!(report.message, "No issues found");
    assert_eq!(report.output, "No issues found");
    assert_eq!(report.project_path, path_str(project.path()));
    assert!(!report.has_issues);

    let call = exec.last_call().unwrap();
    assert_eq!(call.cwd, project.path());
    assert_eq!(call.argv().first().map(String::as_str), Some("flake8"));
    assert_eq!(call.argv().last().map(String::as_str), Some("."));
}

#[tokio::test]
async fn flake8_with_issues_and_max_line_length() {
    let (project, exec, tools) = setup();
    exec.push(CommandOutput::new(
        "./sample.py:1:1: D100 Missing docstring in public module\n./sample.py:2:80: E501 line too long (90 > 79 characters)\n",
        "",
        1,
    ));

    let opts = Flake8Options {
        max_line_length: Some(120),
        ..Flake8Options::default()
    };
    let report = tools
        .flake8(ToolContext::new(), path_str(project.path()), opts)
        .await
        .into_result()
        .unwrap();
    assert_eq!(report.message, "Found 2 issues");
    assert_eq!(report.issues_count, 2);
    assert!(report.output.contains("E501 line too long"));
    assert!(exec.last_call().unwrap().args.contains(&"--max-line-length=120".to_string()));
}

#[tokio::test]
async fn flake8_setup_cfg_section_is_discovered() {
    let (project, exec, tools) = setup();
    fs::write(project.path().join("setup.cfg"), "[flake8]\nmax-line-length = 100\n").unwrap();
    exec.push(CommandOutput::new("", "", 0));

    tools
        .flake8(ToolContext::new(), path_str(project.path()), Flake8Options::default())
        .await;
    let expected = format!(
        "--config={}",
        std::path::absolute(project.path().join("setup.cfg")).unwrap().display()
    );
    assert!(exec.last_call().unwrap().args.contains(&expected));
}

#[tokio::test]
async fn flake8_broken_run_is_failure_envelope() {
    let (project, exec, tools) = setup();
    exec.push(CommandOutput::new("", "Error running flake8", 2));

    let env = tools
        .flake8(ToolContext::new(), path_str(project.path()), Flake8Options::default())
        .await;
    assert!(!env.is_success());
    assert!(env.data().is_none());
    assert!(
        env.error()
            .unwrap()
            .starts_with("Failed to run Flake8Tool: flake8 failed: Error running flake8")
    );
}

// ---------------------------------------------------------------------------
// mypy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mypy_with_issues() {
    let (project, exec, tools) = setup();
    exec.push(CommandOutput::new(
        "mypy_sample.py:3: error: Function is missing a type annotation\n\
         mypy_sample.py:6: error: Incompatible return value type\n\
         mypy_sample.py:11: error: Incompatible return value type\n\
         Found 3 errors in 1 file (checked 1 source file)\n",
        "",
        1,
    ));

    let report = tools
        .mypy(ToolContext::new(), path_str(project.path()), MypyOptions::default())
        .await
        .into_result()
        .unwrap();
    assert_eq!(report.message, "Found 3 type issues");
    assert_eq!(report.issues_count, 3);
    assert!(report.has_issues);
    assert!(report.output.contains("error: Function is missing a type annotation"));
}

#[tokio::test]
async fn mypy_flags_and_custom_args() {
    let (project, exec, tools) = setup();
    exec.push(CommandOutput::new("", "", 0));

    let opts = MypyOptions {
        disallow_untyped_defs: true,
        disallow_incomplete_defs: true,
        args: vec!["--ignore-missing-imports".into()],
        ..MypyOptions::default()
    };
    let env = tools
        .mypy(ToolContext::new(), path_str(project.path()), opts)
        .await;
    assert!(env.is_success());

    let args = exec.last_call().unwrap().args;
    for flag in [
        "--disallow-untyped-defs",
        "--disallow-incomplete-defs",
        "--ignore-missing-imports",
    ] {
        assert!(args.contains(&flag.to_string()), "missing {flag}");
    }
}

#[tokio::test]
async fn mypy_config_in_parent_directory() {
    let (project, exec, tools) = setup();
    let subdir = project.path().join("subdir");
    fs::create_dir(&subdir).unwrap();
    fs::write(project.path().join("mypy.ini"), "[mypy]\nexclude = tests/\n").unwrap();
    exec.push(CommandOutput::new("", "", 0));

    let env = tools
        .mypy(ToolContext::new(), path_str(&subdir), MypyOptions::default())
        .await;
    assert!(env.is_success());

    let call = exec.last_call().unwrap();
    let idx = call.args.iter().position(|a| a == "--config-file").unwrap();
    let expected = std::path::absolute(project.path().join("mypy.ini")).unwrap();
    assert_eq!(call.args[idx + 1], expected.display().to_string());
    assert_eq!(call.cwd, subdir);
}

#[tokio::test]
async fn mypy_auto_excludes_tests_directory() {
    let (project, exec, tools) = setup();
    fs::create_dir(project.path().join("tests")).unwrap();
    exec.push(CommandOutput::new("", "", 0));

    tools
        .mypy(ToolContext::new(), path_str(project.path()), MypyOptions::default())
        .await;
    assert!(
        exec.last_call()
            .unwrap()
            .args
            .contains(&"--exclude=tests/".to_string())
    );
}

#[tokio::test]
async fn mypy_error_with_empty_stderr() {
    let (project, exec, tools) = setup();
    exec.push(CommandOutput::new("", "", 2));

    let env = tools
        .mypy(ToolContext::new(), path_str(project.path()), MypyOptions::default())
        .await;
    assert!(!env.is_success());
    assert!(env.error().unwrap().contains("mypy failed"));
}

// ---------------------------------------------------------------------------
// pytest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pytest_success() {
    let (project, exec, tools) = setup();
    exec.push(CommandOutput::new(
        "===== test session starts =====\ncollected 2 items\n\ntest_sample.py ..\n\n===== 2 passed in 0.01s =====\n",
        "",
        0,
    ));

    let report = tools
        .pytest(ToolContext::new(), path_str(project.path()), PytestOptions::default())
        .await
        .into_result()
        .unwrap();
    assert_eq!(report.message, "All tests passed successfully");
    assert!(report.output.contains("2 passed"));
    assert_eq!(report.project_path, path_str(project.path()));
    assert_eq!(report.details.test_summary.passed, 2);
    assert_eq!(report.details.test_summary.total, 2);
}

#[tokio::test]
async fn pytest_failure_is_still_success_envelope() {
    let (project, exec, tools) = setup();
    exec.push(CommandOutput::new(
        "test_sample.py .F\n\n===== 1 passed, 1 failed in 0.01s =====\n",
        "",
        1,
    ));

    let env = tools
        .pytest(ToolContext::new(), path_str(project.path()), PytestOptions::default())
        .await;
    assert!(env.is_success());
    let report = env.into_result().unwrap();
    assert_eq!(report.message, "Some tests failed");
    assert!(report.output.contains("1 passed, 1 failed"));
    assert_eq!(report.details.test_summary.total, 2);
    assert_eq!(report.issues_count, 1);
}

#[tokio::test]
async fn pytest_with_coverage() {
    let (project, exec, tools) = setup();
    exec.push(CommandOutput::new(
        "\
---------- coverage: platform linux, python 3.12.1-final-0 -----------
Name                    Stmts   Miss  Cover
-------------------------------------------
snake/__init__.py           0      0   100%
snake/mcp/server.py        42     10    76%
-------------------------------------------
TOTAL                      42     10    76%
FAIL Required test coverage of 80% not reached. Total coverage: 76.19%

===== 5 passed in 0.30s =====
",
        "",
        1,
    ));

    let opts = PytestOptions {
        args: vec!["--cov=snake".into(), "--cov-fail-under=80".into()],
        ..PytestOptions::default()
    };
    let report = tools
        .pytest(ToolContext::new(), path_str(project.path()), opts)
        .await
        .into_result()
        .unwrap();
    let coverage = &report.details.coverage;
    assert_eq!(coverage.total, 76.0);
    assert_eq!(coverage.by_file.len(), 2);
    assert!(coverage.failure.is_some());
    assert_eq!(report.issues_count, 1);
    assert!(report.has_issues);
}

#[tokio::test]
async fn pytest_launch_failure_is_failure_envelope() {
    let (project, exec, tools) = setup();
    exec.push_launch_failure(std::io::ErrorKind::NotFound);

    let env = tools
        .pytest(ToolContext::new(), path_str(project.path()), PytestOptions::default())
        .await;
    let error = env.error().unwrap();
    assert!(error.starts_with("Failed to run PytestTool: failed to launch pytest"));
    assert!(error.contains("Caused by: scripted launch failure"));
}

// ---------------------------------------------------------------------------
// path handling and registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_path_never_runs_the_binary() {
    let (_project, exec, tools) = setup();
    let env = tools
        .flake8(ToolContext::new(), "/nonexistent/snake/project", Flake8Options::default())
        .await;
    assert!(
        env.error()
            .unwrap()
            .starts_with("Failed to run Flake8Tool: Path '/nonexistent/snake/project' does not exist")
    );
    assert!(exec.calls().is_empty());
}

#[tokio::test]
async fn file_path_is_not_a_working_directory() {
    let (project, exec, tools) = setup();
    let file = project.path().join("sample.py");
    let env = tools
        .mypy(ToolContext::new(), path_str(&file), MypyOptions::default())
        .await;
    let expected = format!("Failed to run MypyTool: Path '{}' is not a directory", file.display());
    assert!(env.error().unwrap().starts_with(&expected));
    assert!(exec.calls().is_empty());
}

#[tokio::test]
async fn registry_dispatch_uses_wire_shape() {
    let (project, exec, tools) = setup();
    exec.push(CommandOutput::new("===== 1 passed in 0.01s =====", "", 0));
    let registry = build_registry(&tools);

    let args = serde_json::json!({
        "path": path_str(project.path()),
        "verbose": true,
        "keyword": "add",
    });
    let data = registry
        .dispatch_json("pytest", args, &ToolContext::new())
        .await
        .unwrap();
    assert_eq!(data["success"], true);
    assert_eq!(data["error"], serde_json::Value::Null);
    assert_eq!(data["data"]["test_summary"]["passed"], 1);
    assert_eq!(data["data"]["coverage"]["total"], 0.0);

    let args = exec.last_call().unwrap().args;
    assert_eq!(args, vec!["-v", "-k", "add", "."]);
}
