//! The `{success, data, error}` result shape returned by every tool run.

use crate::fmt::{TextFormat, TextOptions};
use schemars::JsonSchema;
use serde::Serialize;

/// Uniform result envelope.
///
/// Fields are private so the two shapes stay exclusive: a success carries
/// data and no error, a failure carries a non-empty error and no data.
/// All three keys are always serialized.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Envelope<D> {
    success: bool,
    data: Option<D>,
    error: Option<String>,
}

impl<D> Envelope<D> {
    /// Successful run carrying `data`.
    pub fn success(data: D) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed run. An empty message is replaced so the error is never blank.
    pub fn failure(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "unknown error".to_string();
        }
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Collapse into a `Result`, yielding the data or the error message.
    pub fn into_result(self) -> Result<D, String> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(error)) => Err(error),
            (None, None) => Err("envelope carried neither data nor error".to_string()),
        }
    }

    /// Map the data of a successful envelope.
    pub fn map<E>(self, f: impl FnOnce(D) -> E) -> Envelope<E> {
        Envelope {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl<D: TextFormat> TextFormat for Envelope<D> {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        match (&self.data, &self.error) {
            (Some(data), _) => data.fmt_text(opts),
            (None, Some(error)) => format!("Error: {error}"),
            (None, None) => String::new(),
        }
    }
}
