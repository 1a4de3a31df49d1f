//! MCP server handler backed by a [`ToolRegistry`].

use rmcp::model as m;
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use snake_tools_core::fmt::{TextOptions, fallback_text_from_json};
use snake_tools_core::{ToolContext, ToolRegistry};
use std::collections::HashSet;
use std::sync::Arc;

/// Output mode for tool results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Envelope rendered as text. Default.
    #[default]
    Text,
    /// Text plus the envelope as `structured_content`; `list_tools`
    /// publishes output schemas.
    Structured,
}

/// MCP server handler backed by a [`ToolRegistry`].
///
/// - tools are discovered from the registry, filtered by an optional allowlist
/// - `is_error` on a call result mirrors `!envelope.success`
/// - a cancelled request drops the running tool, which kills its child process
pub struct RegistryServer {
    registry: Arc<ToolRegistry>,
    allowlist: Option<HashSet<String>>,
    output_mode: OutputMode,
    text_opts: TextOptions,
    name: String,
    version: String,
    instructions: Option<String>,
}

impl RegistryServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            allowlist: None,
            output_mode: OutputMode::default(),
            text_opts: TextOptions::default(),
            name: "snake".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: None,
        }
    }

    /// Only tools in this list are visible and callable.
    pub fn with_allowlist(mut self, allowlist: impl IntoIterator<Item = String>) -> Self {
        self.allowlist = Some(allowlist.into_iter().collect());
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_text_options(mut self, opts: TextOptions) -> Self {
        self.text_opts = opts;
        self
    }

    pub fn with_info(mut self, name: &str, version: &str) -> Self {
        self.name = name.to_string();
        self.version = version.to_string();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Registered tool names that pass the allowlist, sorted.
    pub fn effective_tool_names(&self) -> Vec<String> {
        self.registry
            .list_names()
            .into_iter()
            .filter(|n| self.is_allowed(n))
            .collect()
    }

    fn is_allowed(&self, name: &str) -> bool {
        self.allowlist.as_ref().is_none_or(|set| set.contains(name))
    }

    /// Tool descriptors as published by `list_tools`.
    pub fn tools(&self) -> Vec<m::Tool> {
        self.effective_tool_names()
            .into_iter()
            .filter_map(|name| {
                let erased = self.registry.get(&name)?;
                let input_schema = serde_json::to_value(erased.input_schema())
                    .ok()
                    .and_then(|v| v.as_object().cloned())
                    .unwrap_or_default();

                let output_schema = if self.output_mode == OutputMode::Structured {
                    erased.output_schema().and_then(|s| {
                        serde_json::to_value(&s)
                            .ok()
                            .and_then(|v| v.as_object().cloned())
                            .map(Arc::new)
                    })
                } else {
                    None
                };

                Some(m::Tool {
                    name: name.clone().into(),
                    title: Some(name),
                    description: Some(erased.description().to_string().into()),
                    input_schema: Arc::new(input_schema),
                    annotations: None,
                    output_schema,
                    icons: None,
                    meta: None,
                })
            })
            .collect()
    }

    /// Dispatch one call and build the MCP result.
    ///
    /// Argument decoding problems and unknown names are error results; every
    /// decoded call yields the tool's envelope with `is_error = !success`.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<m::JsonObject>,
        ctx: &ToolContext,
    ) -> m::CallToolResult {
        if !self.is_allowed(name) {
            return m::CallToolResult::error(vec![m::Content::text(format!(
                "Tool '{name}' not enabled on this server"
            ))]);
        }

        let args = serde_json::Value::Object(arguments.unwrap_or_default());
        tracing::debug!(tool = name, request_id = ?ctx.request_id(), "dispatching");

        match self
            .registry
            .dispatch_json_formatted(name, args, ctx, &self.text_opts)
            .await
        {
            Ok(res) => {
                tracing::info!(tool = name, success = res.success, "tool call finished");
                let text = res
                    .text
                    .unwrap_or_else(|| fallback_text_from_json(&res.data));

                let has_schema = self
                    .registry
                    .get(name)
                    .and_then(|t| t.output_schema())
                    .is_some();
                let structured_content =
                    (self.output_mode == OutputMode::Structured && has_schema).then_some(res.data);

                m::CallToolResult {
                    content: vec![m::Content::text(text)],
                    structured_content,
                    is_error: Some(!res.success),
                    meta: None,
                }
            }
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool call rejected");
                m::CallToolResult::error(vec![m::Content::text(e.to_string())])
            }
        }
    }

    /// [`call`](Self::call) raced against `cancelled`.
    ///
    /// When `cancelled` resolves first the tool future is dropped, which kills
    /// any child process it spawned, and an error result is returned.
    pub async fn call_until(
        &self,
        name: &str,
        arguments: Option<m::JsonObject>,
        ctx: &ToolContext,
        cancelled: impl std::future::Future<Output = ()>,
    ) -> m::CallToolResult {
        tokio::select! {
            result = self.call(name, arguments, ctx) => result,
            () = cancelled => {
                tracing::info!(tool = name, "tool call cancelled");
                m::CallToolResult::error(vec![m::Content::text(format!(
                    "Tool '{name}' was cancelled"
                ))])
            }
        }
    }
}

/// Request id and client name for the tool context.
fn tool_context(ctx: &RequestContext<RoleServer>) -> ToolContext {
    let id = match serde_json::to_value(&ctx.id) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    };
    let tool_ctx = ToolContext::new().with_request_id(id);
    match ctx.peer.peer_info() {
        Some(info) => tool_ctx.with_client(info.client_info.name.clone()),
        None => tool_ctx,
    }
}

#[expect(
    clippy::manual_async_fn,
    reason = "trait signatures return impl Future"
)]
impl ServerHandler for RegistryServer {
    fn get_info(&self) -> m::ServerInfo {
        m::ServerInfo {
            server_info: m::Implementation {
                name: self.name.clone(),
                title: Some(self.name.clone()),
                version: self.version.clone(),
                website_url: None,
                icons: None,
            },
            capabilities: m::ServerCapabilities::builder().enable_tools().build(),
            instructions: self.instructions.clone(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _req: Option<m::PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ListToolsResult, m::ErrorData>> + Send + '_
    {
        async move {
            Ok(m::ListToolsResult {
                tools: self.tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        req: m::CallToolRequestParam,
        ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::CallToolResult, m::ErrorData>> + Send + '_
    {
        async move {
            let tool_ctx = tool_context(&ctx);
            Ok(self
                .call_until(&req.name, req.arguments, &tool_ctx, ctx.ct.cancelled())
                .await)
        }
    }

    fn ping(
        &self,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<(), m::ErrorData>> + Send + '_ {
        async { Ok(()) }
    }
}
