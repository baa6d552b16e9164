//! Error types for model loading.

use thiserror::Error;

/// Failure to produce a model for `path`.
///
/// Cloneable so that every caller waiting on a shared load gets the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelLoadError {
    #[error("Failed to fetch model {path}: {message}")]
    Fetch {
        path: String,
        message: String,
        /// Whether retrying may succeed
        transient: bool,
    },

    #[error("Failed to decode model {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Model {path} contains no triangle meshes")]
    Empty { path: String },
}

impl ModelLoadError {
    /// Path of the model that failed
    pub fn path(&self) -> &str {
        match self {
            Self::Fetch { path, .. } | Self::Decode { path, .. } | Self::Empty { path } => path,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch { transient: true, .. })
    }
}
