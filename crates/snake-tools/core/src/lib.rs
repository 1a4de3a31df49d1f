//! Core traits and types for the snake tool family.
//!
//! This crate provides:
//! - [`Tool`] trait: one external developer utility behind a single `handle` hook
//! - [`ToolInstance`]: context + lazily validated path + `run`, which folds every
//!   error into an [`Envelope`]
//! - [`ToolRegistry`]: name-keyed storage with JSON dispatch for protocol servers
//! - [`TextFormat`] trait: transport-agnostic text rendering of tool outputs

pub mod context;
pub mod envelope;
pub mod error;
pub mod fmt;
pub mod path;
pub mod registry;
pub mod schema;
pub mod tool;

pub use context::ToolContext;
pub use envelope::Envelope;
pub use error::ToolError;
pub use fmt::{TextFormat, TextOptions, TextStyle, fallback_text_from_json};
pub use path::{PathState, validate_path};
pub use registry::{ErasedTool, FormattedResult, ToolCall, ToolRegistry, ToolRegistryBuilder};
pub use tool::{Tool, ToolInstance};

// Re-export BoxFuture so tool crates can name the `handle` signature.
pub use futures::future::BoxFuture;
