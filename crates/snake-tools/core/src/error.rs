//! Unified error type for snake tools.

use std::error::Error as _;
use std::path::PathBuf;
use thiserror::Error;

/// Error type returned by tool operations.
///
/// Every variant is caught by [`ToolInstance::run`](crate::ToolInstance::run)
/// and rendered into a failure envelope; none of them escape to the caller.
#[derive(Error, Debug)]
pub enum ToolError {
    /// A required binding (context or path) was never provided.
    #[error("{0} is not set")]
    NotSet(&'static str),

    /// The target path does not exist on the filesystem.
    #[error("Path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),

    /// The target exists but cannot be used as a working directory.
    #[error("Path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The tool does not override `handle`.
    #[error("{0} does not implement handle")]
    NotImplemented(&'static str),

    /// The external binary could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external binary ran but reported a failure of its own.
    #[error("{tool} failed: {stderr}")]
    ToolFailed { tool: String, stderr: String },

    /// Invalid input provided to the tool.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem error while inspecting the target.
    #[error("io error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Internal error during tool execution.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create an invalid input error.
    pub fn invalid_input<S: ToString>(s: S) -> Self {
        ToolError::InvalidInput(s.to_string())
    }

    /// Create an internal error.
    pub fn internal<S: ToString>(s: S) -> Self {
        ToolError::Internal(s.to_string())
    }

    /// Create a tool-failure error from the tool name and its stderr.
    pub fn tool_failed<S: ToString>(tool: &str, stderr: S) -> Self {
        ToolError::ToolFailed {
            tool: tool.to_string(),
            stderr: stderr.to_string(),
        }
    }

    /// Render the source chain of this error, one cause per line.
    ///
    /// A backtrace is appended when one was captured (`RUST_BACKTRACE=1`).
    pub fn trace(&self) -> String {
        let mut lines = Vec::new();
        let mut cause = self.source();
        while let Some(err) = cause {
            lines.push(format!("Caused by: {err}"));
            cause = err.source();
        }
        let backtrace = std::backtrace::Backtrace::capture();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            lines.push(backtrace.to_string());
        }
        lines.join("\n")
    }
}
