//! Command-line assembly and execution shared by the adapters.

use crate::discovery::{Candidate, find_config};
use crate::exec::{CommandOutput, CommandSpec, Executor};
use snake_config::ToolConfig;
use snake_tools_core::ToolError;
use std::path::Path;

/// How a tool is told which config file to read.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ConfigFlag {
    /// `<flag><file>`, e.g. `--config=<file>`
    Joined(&'static str),
    /// `<flag> <file>` as two arguments
    Separate(&'static str),
}

/// Static facts about one wrapped executable.
#[derive(Debug)]
pub(crate) struct Wrapped {
    pub name: &'static str,
    pub configs: &'static [Candidate],
    pub config_flag: ConfigFlag,
}

impl Wrapped {
    /// Binary, configured default args and the discovered config file flag.
    ///
    /// Adapters append their option flags, exclusions, extra args and the target.
    pub fn command(&self, config: &ToolConfig, path: &Path) -> CommandSpec {
        let mut spec = CommandSpec::new(config.binary_or(self.name), path);
        spec.args(config.default_args.iter().cloned());

        if config.discover_config
            && let Some(file) = find_config(path, self.configs)
        {
            let file = file.display().to_string();
            match self.config_flag {
                ConfigFlag::Joined(flag) => {
                    spec.arg(format!("{flag}{file}"));
                }
                ConfigFlag::Separate(flag) => {
                    spec.arg(flag).arg(file);
                }
            }
        }
        spec
    }

    /// Run the command and reject outcomes that carry no report at all.
    ///
    /// The working directory is checked first so a file target is reported
    /// as such instead of as a launch failure.
    pub async fn run(
        &self,
        exec: &dyn Executor,
        spec: &CommandSpec,
    ) -> Result<(CommandOutput, i32), ToolError> {
        if !spec.cwd.is_dir() {
            return Err(ToolError::NotADirectory(spec.cwd.clone()));
        }
        tracing::debug!(tool = self.name, cwd = %spec.cwd.display(), cmd = %spec.display(), "running");
        let output = exec.execute(spec).await?;
        tracing::info!(tool = self.name, returncode = ?output.returncode, "finished");

        match output.returncode {
            Some(code) => Ok((output, code)),
            None => Err(ToolError::tool_failed(
                self.name,
                format!("terminated by signal\n{}", output.stderr),
            )),
        }
    }
}

/// Target argument: the working directory itself.
pub(crate) const TARGET: &str = ".";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::MYPY_CONFIGS;
    use crate::exec::ScriptedExecutor;
    use tempfile::TempDir;

    const MYPY: Wrapped = Wrapped {
        name: "mypy",
        configs: MYPY_CONFIGS,
        config_flag: ConfigFlag::Separate("--config-file"),
    };

    #[test]
    fn binary_and_default_args_come_first() {
        let tmp = TempDir::new().unwrap();
        let config = ToolConfig {
            binary: Some(".venv/bin/mypy".into()),
            default_args: vec!["--pretty".into()],
            discover_config: true,
        };
        let spec = MYPY.command(&config, tmp.path());
        assert_eq!(spec.argv(), vec![".venv/bin/mypy", "--pretty"]);
        assert_eq!(spec.cwd, tmp.path());
    }

    #[test]
    fn discovered_config_is_passed() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("mypy.ini"), "[mypy]\n").unwrap();
        let spec = MYPY.command(&ToolConfig::default(), tmp.path());
        let expected = std::path::absolute(tmp.path().join("mypy.ini")).unwrap();
        assert_eq!(
            spec.args,
            vec!["--config-file".to_string(), expected.display().to_string()]
        );
    }

    #[test]
    fn discovery_can_be_disabled() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("mypy.ini"), "[mypy]\n").unwrap();
        let config = ToolConfig {
            discover_config: false,
            ..ToolConfig::default()
        };
        assert!(MYPY.command(&config, tmp.path()).args.is_empty());
    }

    #[tokio::test]
    async fn file_target_is_rejected_before_launch() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("module.py");
        std::fs::write(&file, "x = 1\n").unwrap();
        let exec = ScriptedExecutor::new();

        let spec = MYPY.command(&ToolConfig::default(), &file);
        let err = MYPY.run(&exec, &spec).await.unwrap_err();
        assert_eq!(err.to_string(), format!("Path '{}' is not a directory", file.display()));
        assert!(exec.calls().is_empty());
    }

    #[tokio::test]
    async fn signal_termination_is_an_error() {
        let exec = ScriptedExecutor::new();
        exec.push(CommandOutput {
            stdout: String::new(),
            stderr: "killed".into(),
            returncode: None,
        });
        let spec = CommandSpec::new("mypy", Path::new("."));
        let err = MYPY.run(&exec, &spec).await.unwrap_err();
        assert_eq!(err.to_string(), "mypy failed: terminated by signal\nkilled");
    }
}
