//! MCP server integration for the snake tool family.
//!
//! [`RegistryServer`] is an rmcp server handler that exposes a
//! [`ToolRegistry`](snake_tools_core::ToolRegistry) with optional allowlist
//! filtering. Every call result carries the tool's envelope.

mod server;

pub use server::{OutputMode, RegistryServer};

pub use rmcp::transport::stdio;
pub use rmcp::{ServerHandler, service::ServiceExt};
