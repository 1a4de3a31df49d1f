//! Tool registry for dynamic dispatch by name.

use crate::context::ToolContext;
use crate::envelope::Envelope;
use crate::error::ToolError;
use crate::fmt::{TextFormat, TextOptions};
use crate::schema::{cached_schema_for, object_schema_for};
use crate::tool::{Tool, ToolInstance};
use futures::future::BoxFuture;
use schemars::{JsonSchema, Schema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

/// Wire input of every registered tool: the target path plus the tool's own options.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ToolCall<O> {
    /// Directory path from which to run the tool (working directory)
    pub path: String,
    #[serde(flatten)]
    pub options: O,
}

/// Result from a JSON dispatch: the serialized envelope plus its text rendering.
#[derive(Debug, Clone)]
pub struct FormattedResult {
    /// Whether the envelope reports success.
    pub success: bool,
    /// The JSON-serialized envelope.
    pub data: Value,
    /// Human-readable text representation.
    pub text: Option<String>,
}

/// Type-erased tool for dynamic dispatch.
pub trait ErasedTool: Send + Sync {
    /// Get the tool's name.
    fn name(&self) -> &'static str;

    /// Get the tool's description.
    fn description(&self) -> &'static str;

    /// Get the input JSON schema.
    fn input_schema(&self) -> Schema;

    /// Get the output (envelope) JSON schema, if it is object-rooted.
    fn output_schema(&self) -> Option<Schema>;

    /// Run a fresh instance of the tool with JSON arguments.
    ///
    /// Errors are reserved for arguments that do not decode; everything that
    /// happens after decoding is reported inside the envelope.
    fn call_json_formatted(
        &self,
        args: Value,
        ctx: &ToolContext,
        text_opts: &TextOptions,
    ) -> BoxFuture<'static, Result<FormattedResult, ToolError>>;
}

/// Registry of tools keyed by wire name.
pub struct ToolRegistry {
    map: BTreeMap<String, Arc<dyn ErasedTool>>,
}

impl ToolRegistry {
    /// Create a new registry builder.
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// List all tool names, sorted.
    pub fn list_names(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ErasedTool>> {
        self.map.get(name)
    }

    /// Create a subset registry containing only the specified tools.
    ///
    /// Names not found in the registry are silently ignored.
    pub fn subset<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> ToolRegistry {
        let allowed: HashSet<&str> = names.into_iter().collect();
        let map = self
            .map
            .iter()
            .filter(|(k, _)| allowed.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect();
        ToolRegistry { map }
    }

    /// Dispatch a tool call using JSON arguments, returning the envelope and its text.
    pub async fn dispatch_json_formatted(
        &self,
        name: &str,
        args: Value,
        ctx: &ToolContext,
        text_opts: &TextOptions,
    ) -> Result<FormattedResult, ToolError> {
        let entry = self
            .map
            .get(name)
            .ok_or_else(|| ToolError::invalid_input(format!("Unknown tool: {name}")))?;
        entry.call_json_formatted(args, ctx, text_opts).await
    }

    /// Dispatch a tool call using JSON arguments, returning the envelope as JSON.
    pub async fn dispatch_json(
        &self,
        name: &str,
        args: Value,
        ctx: &ToolContext,
    ) -> Result<Value, ToolError> {
        self.dispatch_json_formatted(name, args, ctx, &TextOptions::default())
            .await
            .map(|res| res.data)
    }

    /// Check if a tool is registered by name.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Builder for constructing a [`ToolRegistry`].
#[derive(Default)]
pub struct ToolRegistryBuilder {
    items: Vec<Arc<dyn ErasedTool>>,
}

impl ToolRegistryBuilder {
    /// Register a tool. Each call through the registry runs a fresh
    /// [`ToolInstance`] around a clone of `tool`.
    pub fn register<T>(mut self, tool: T) -> Self
    where
        T: Tool + Clone,
        T::Options: DeserializeOwned + JsonSchema,
        T::Output: Serialize + JsonSchema + TextFormat,
    {
        struct Impl<T: Tool + Clone> {
            tool: T,
            _marker: PhantomData<fn() -> T>,
        }

        impl<T> ErasedTool for Impl<T>
        where
            T: Tool + Clone,
            T::Options: DeserializeOwned + JsonSchema,
            T::Output: Serialize + JsonSchema + TextFormat,
        {
            fn name(&self) -> &'static str {
                T::NAME
            }

            fn description(&self) -> &'static str {
                T::DESCRIPTION
            }

            fn input_schema(&self) -> Schema {
                cached_schema_for::<ToolCall<T::Options>>().as_ref().clone()
            }

            fn output_schema(&self) -> Option<Schema> {
                object_schema_for::<Envelope<T::Output>>()
                    .ok()
                    .map(|arc| arc.as_ref().clone())
            }

            fn call_json_formatted(
                &self,
                args: Value,
                ctx: &ToolContext,
                text_opts: &TextOptions,
            ) -> BoxFuture<'static, Result<FormattedResult, ToolError>> {
                let call: ToolCall<T::Options> = match serde_json::from_value(args) {
                    Ok(call) => call,
                    Err(e) => {
                        return Box::pin(async move { Err(ToolError::invalid_input(e)) });
                    }
                };
                let ctx = ctx.clone();
                let tool = self.tool.clone();
                let text_opts = text_opts.clone();

                Box::pin(async move {
                    let mut instance = ToolInstance::new(tool);
                    let envelope = instance.run(Some(ctx), Some(call.path), call.options).await;
                    let text = envelope.fmt_text(&text_opts);
                    let data = serde_json::to_value(&envelope)
                        .map_err(|e| ToolError::internal(e.to_string()))?;
                    Ok(FormattedResult {
                        success: envelope.is_success(),
                        data,
                        text: Some(text),
                    })
                })
            }
        }

        self.items.push(Arc::new(Impl::<T> {
            tool,
            _marker: PhantomData,
        }));
        self
    }

    /// Build the registry. Later registrations with a duplicate name win.
    pub fn finish(self) -> ToolRegistry {
        let map = self
            .items
            .into_iter()
            .map(|erased| (erased.name().to_string(), erased))
            .collect();
        ToolRegistry { map }
    }
}
