//! Transport-agnostic text formatting for tool outputs.
//!
//! Implement [`TextFormat`] for tool output types to control the
//! human-readable text sent alongside JSON data:
//!
//! ```ignore
//! use snake_tools_core::fmt::{TextFormat, TextOptions};
//!
//! struct Summary {
//!     failed: usize,
//! }
//!
//! impl TextFormat for Summary {
//!     fn fmt_text(&self, _opts: &TextOptions) -> String {
//!         format!("{} failed", self.failed)
//!     }
//! }
//! ```

use serde_json::Value as JsonValue;

/// Text rendering style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TextStyle {
    /// Human-friendly formatting with headings.
    #[default]
    Humanized,
    /// Plain text without decoration.
    Plain,
}

/// Options controlling text formatting behavior.
#[derive(Clone, Debug, Default)]
pub struct TextOptions {
    /// The rendering style to use.
    pub style: TextStyle,
    /// Maximum number of items to display in collections.
    pub max_items: Option<usize>,
}

impl TextOptions {
    /// Create new text options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text style.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the maximum number of items to display.
    pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }
}

/// Human-readable formatting for tool outputs.
pub trait TextFormat {
    /// Format the value as human-readable text.
    fn fmt_text(&self, opts: &TextOptions) -> String;
}

/// Pretty JSON fallback for values without a [`TextFormat`] implementation.
pub fn fallback_text_from_json(v: &JsonValue) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

impl TextFormat for JsonValue {
    fn fmt_text(&self, _opts: &TextOptions) -> String {
        fallback_text_from_json(self)
    }
}
