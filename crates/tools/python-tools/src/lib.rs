//! flake8, mypy and pytest as snake tools.
//!
//! Each adapter runs its executable in the target directory and turns the
//! output into a [`CheckReport`](types::CheckReport). Findings (lint issues,
//! type errors, failing tests) are successful results with `has_issues` set;
//! only a broken run is a failure envelope.
//!
//! ```no_run
//! # async fn demo() {
//! use python_tools::PythonTools;
//! use python_tools::types::MypyOptions;
//! use snake_config::ToolsConfig;
//! use snake_tools_core::ToolContext;
//!
//! let tools = PythonTools::new(ToolsConfig::default());
//! let opts = MypyOptions { strict: true, ..MypyOptions::default() };
//! let envelope = tools.mypy(ToolContext::new(), ".", opts).await;
//! println!("{:?}", envelope.error());
//! # }
//! ```

mod command;
pub mod coverage;
pub mod discovery;
pub mod exec;
pub mod flake8;
pub mod mypy;
pub mod pytest;
pub mod tools;
pub mod types;

pub use exec::{CommandOutput, CommandSpec, Executor, ScriptedExecutor, SystemExecutor};
pub use flake8::Flake8Tool;
pub use mypy::MypyTool;
pub use pytest::PytestTool;
pub use tools::build_registry;

use snake_config::ToolsConfig;
use snake_tools_core::{Envelope, ToolContext, ToolInstance};
use std::sync::Arc;
use types::{Flake8Options, LintReport, MypyOptions, PytestOptions, TestReport};

/// Function-call surface over the three tools.
///
/// Every call builds a fresh tool instance, runs it and returns the envelope as is.
#[derive(Clone)]
pub struct PythonTools {
    exec: Arc<dyn Executor>,
    config: ToolsConfig,
}

impl PythonTools {
    /// Tools backed by real subprocesses.
    pub fn new(config: ToolsConfig) -> Self {
        Self::with_executor(Arc::new(SystemExecutor), config)
    }

    pub fn with_executor(exec: Arc<dyn Executor>, config: ToolsConfig) -> Self {
        Self { exec, config }
    }

    pub fn flake8_tool(&self) -> Flake8Tool {
        Flake8Tool::new(Arc::clone(&self.exec), self.config.flake8.clone())
    }

    pub fn mypy_tool(&self) -> MypyTool {
        MypyTool::new(Arc::clone(&self.exec), self.config.mypy.clone())
    }

    pub fn pytest_tool(&self) -> PytestTool {
        PytestTool::new(Arc::clone(&self.exec), self.config.pytest.clone())
    }

    pub async fn flake8(
        &self,
        ctx: ToolContext,
        path: impl Into<String>,
        options: Flake8Options,
    ) -> Envelope<LintReport> {
        ToolInstance::new(self.flake8_tool())
            .run(Some(ctx), Some(path.into()), options)
            .await
    }

    pub async fn mypy(
        &self,
        ctx: ToolContext,
        path: impl Into<String>,
        options: MypyOptions,
    ) -> Envelope<LintReport> {
        ToolInstance::new(self.mypy_tool())
            .run(Some(ctx), Some(path.into()), options)
            .await
    }

    pub async fn pytest(
        &self,
        ctx: ToolContext,
        path: impl Into<String>,
        options: PytestOptions,
    ) -> Envelope<TestReport> {
        ToolInstance::new(self.pytest_tool())
            .run(Some(ctx), Some(path.into()), options)
            .await
    }
}
