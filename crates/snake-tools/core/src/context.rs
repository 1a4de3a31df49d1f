//! Tool execution context.

/// Context passed to tool executions.
///
/// Opaque to the tools themselves: it is owned by the caller and carried
/// through so results can be correlated with the invoking request.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct ToolContext {
    request_id: Option<String>,
    client: Option<String>,
}

impl ToolContext {
    /// Create a new default context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the protocol request id.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Attach the calling client's name.
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn client(&self) -> Option<&str> {
        self.client.as_deref()
    }
}
