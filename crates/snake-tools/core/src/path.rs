//! Target path validation with compute-once caching.

use crate::error::ToolError;
use std::path::{Path, PathBuf};

/// Check that `raw` names an existing filesystem entry.
///
/// The path is kept as given (not canonicalized) so error messages and
/// reports echo what the caller sent.
pub fn validate_path(raw: &str) -> Result<PathBuf, ToolError> {
    let path = PathBuf::from(raw);
    match path.try_exists() {
        Ok(true) => Ok(path),
        Ok(false) => Err(ToolError::PathNotFound(path)),
        Err(source) => Err(ToolError::Io { path, source }),
    }
}

/// Validation state of a tool instance's target path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PathState {
    /// Nothing validated yet (or the path string changed since).
    #[default]
    Unset,
    /// `source` validated successfully to `path`.
    Validated { source: String, path: PathBuf },
}

impl PathState {
    /// Return the cached path if it was validated from `raw`.
    pub fn cached_for(&self, raw: &str) -> Option<&Path> {
        match self {
            PathState::Validated { source, path } if source == raw => Some(path),
            _ => None,
        }
    }

    pub fn is_validated(&self) -> bool {
        matches!(self, PathState::Validated { .. })
    }
}
