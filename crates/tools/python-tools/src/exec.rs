//! Subprocess execution behind a swappable [`Executor`] seam.
//!
//! Adapters never spawn processes directly. Production code uses
//! [`SystemExecutor`]; tests script outputs with [`ScriptedExecutor`].

use futures::future::BoxFuture;
use snake_tools_core::ToolError;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Mutex, PoisonError};

/// A fully assembled command line plus its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Render the command for logs.
    pub fn display(&self) -> String {
        self.argv().join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub returncode: Option<i32>,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, returncode: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            returncode: Some(returncode),
        }
    }

    /// stdout and stderr joined by a newline, trimmed.
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr).trim().to_string()
    }
}

/// Runs a command to completion and captures its output.
pub trait Executor: Send + Sync {
    fn execute<'a>(&'a self, spec: &'a CommandSpec) -> BoxFuture<'a, Result<CommandOutput, ToolError>>;
}

/// Spawns real processes with tokio.
///
/// The child is killed if the returned future is dropped before it finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute<'a>(&'a self, spec: &'a CommandSpec) -> BoxFuture<'a, Result<CommandOutput, ToolError>> {
        Box::pin(async move {
            let output = tokio::process::Command::new(&spec.program)
                .args(&spec.args)
                .current_dir(&spec.cwd)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|source| ToolError::Launch {
                    program: spec.program.clone(),
                    source,
                })?;

            Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                returncode: output.status.code(),
            })
        })
    }
}

#[derive(Debug)]
enum Scripted {
    Output(CommandOutput),
    LaunchFailure(io::ErrorKind),
}

/// Replays canned outputs in order and records every command it is asked to run.
///
/// Running out of scripted responses is reported as a launch failure.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    responses: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one process result.
    pub fn push(&self, output: CommandOutput) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Scripted::Output(output));
        self
    }

    /// Queue a failure to start the process.
    pub fn push_launch_failure(&self, kind: io::ErrorKind) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Scripted::LaunchFailure(kind));
        self
    }

    /// Every command executed so far, oldest first.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent command, if any.
    pub fn last_call(&self) -> Option<CommandSpec> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Executor for ScriptedExecutor {
    fn execute<'a>(&'a self, spec: &'a CommandSpec) -> BoxFuture<'a, Result<CommandOutput, ToolError>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(spec.clone());
        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        Box::pin(async move {
            match next {
                Some(Scripted::Output(output)) => Ok(output),
                Some(Scripted::LaunchFailure(kind)) => Err(ToolError::Launch {
                    program: spec.program.clone(),
                    source: io::Error::new(kind, "scripted launch failure"),
                }),
                None => Err(ToolError::Launch {
                    program: spec.program.clone(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no scripted output left"),
                }),
            }
        })
    }
}
