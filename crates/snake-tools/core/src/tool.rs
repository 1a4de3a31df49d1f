//! Tool trait and the per-invocation tool instance.

use crate::context::ToolContext;
use crate::envelope::Envelope;
use crate::error::ToolError;
use crate::path::{PathState, validate_path};
use futures::future::BoxFuture;
use std::path::Path;

/// A tool wrapping one external developer utility.
///
/// `handle` is the only hook. Its default fails with
/// [`ToolError::NotImplemented`], so a tool that forgets to override it
/// produces a failure envelope rather than silently succeeding.
///
/// # Example
///
/// ```ignore
/// use snake_tools_core::{Tool, ToolContext, ToolError};
/// use futures::future::BoxFuture;
/// use std::path::Path;
///
/// #[derive(Clone)]
/// struct CountTool;
///
/// impl Tool for CountTool {
///     type Options = ();
///     type Output = usize;
///     const NAME: &'static str = "count";
///     const DESCRIPTION: &'static str = "Count entries in a directory";
///
///     fn handle<'a>(&'a self, _ctx: &'a ToolContext, path: &'a Path, _opts: ())
///         -> BoxFuture<'a, Result<usize, ToolError>>
///     {
///         Box::pin(async move { Ok(std::fs::read_dir(path).map(|d| d.count()).unwrap_or(0)) })
///     }
/// }
/// ```
pub trait Tool: Send + Sync + 'static {
    /// Tool-specific options forwarded verbatim to `handle`.
    type Options: Send + 'static;

    /// Data carried by a successful envelope.
    type Output: Send + 'static;

    /// Unique name identifying the tool on the wire.
    const NAME: &'static str;

    /// Human-readable description of what the tool does.
    const DESCRIPTION: &'static str;

    /// Name used in failure messages (`Failed to run <type_name>: ...`).
    fn type_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Do the actual work against a validated path.
    fn handle<'a>(
        &'a self,
        ctx: &'a ToolContext,
        path: &'a Path,
        options: Self::Options,
    ) -> BoxFuture<'a, Result<Self::Output, ToolError>> {
        let _ = (ctx, path, options);
        let name = self.type_name();
        Box::pin(async move { Err(ToolError::NotImplemented(name)) })
    }
}

/// One invocation of a [`Tool`]: the tool plus its context and target path.
///
/// The path is validated lazily, at most once per path string.
#[derive(Debug)]
pub struct ToolInstance<T: Tool> {
    tool: T,
    ctx: Option<ToolContext>,
    path_str: Option<String>,
    state: PathState,
}

impl<T: Tool> ToolInstance<T> {
    /// Wrap a tool with no context and no path bound.
    pub fn new(tool: T) -> Self {
        Self {
            tool,
            ctx: None,
            path_str: None,
            state: PathState::Unset,
        }
    }

    /// Bind a context and a target path up front.
    pub fn bound(tool: T, ctx: ToolContext, path: impl Into<String>) -> Self {
        let mut instance = Self::new(tool);
        instance.set_ctx(ctx);
        instance.set_path(path);
        instance
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// The bound context.
    pub fn ctx(&self) -> Result<&ToolContext, ToolError> {
        self.ctx.as_ref().ok_or(ToolError::NotSet("Context"))
    }

    pub fn set_ctx(&mut self, ctx: ToolContext) {
        self.ctx = Some(ctx);
    }

    /// The raw path string, as supplied.
    pub fn path_str(&self) -> Option<&str> {
        self.path_str.as_deref()
    }

    /// Replace the path string. A different string drops the cached validation.
    pub fn set_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        if self.state.cached_for(&path).is_none() {
            self.state = PathState::Unset;
        }
        self.path_str = Some(path);
    }

    /// The validated path, checking existence on first access only.
    pub fn path(&mut self) -> Result<&Path, ToolError> {
        let raw = self.path_str.as_deref().ok_or(ToolError::NotSet("Path"))?;
        if self.state.cached_for(raw).is_none() {
            let path = validate_path(raw)?;
            self.state = PathState::Validated {
                source: raw.to_string(),
                path,
            };
        }
        match &self.state {
            PathState::Validated { path, .. } => Ok(path),
            PathState::Unset => Err(ToolError::NotSet("Path")),
        }
    }

    pub fn path_state(&self) -> &PathState {
        &self.state
    }

    /// Run the tool, folding every error into a failure envelope.
    ///
    /// `ctx` and `path` overrides replace the stored values before anything
    /// else happens. `handle` is never reached if the path fails validation.
    pub async fn run(
        &mut self,
        ctx: Option<ToolContext>,
        path: Option<String>,
        options: T::Options,
    ) -> Envelope<T::Output> {
        if let Some(ctx) = ctx {
            self.set_ctx(ctx);
        }
        if let Some(path) = path {
            self.set_path(path);
        }

        match self.execute(options).await {
            Ok(output) => {
                tracing::debug!(tool = T::NAME, "tool run succeeded");
                Envelope::success(output)
            }
            Err(err) => {
                let message = format!(
                    "Failed to run {}: {}\n{}",
                    self.tool.type_name(),
                    err,
                    err.trace()
                );
                tracing::warn!(tool = T::NAME, error = %err, "tool run failed");
                Envelope::failure(message)
            }
        }
    }

    async fn execute(&mut self, options: T::Options) -> Result<T::Output, ToolError> {
        let path = self.path()?.to_path_buf();
        let ctx = self.ctx()?;
        self.tool.handle(ctx, &path, options).await
    }
}
