//! Error types
//!
//! Only loading and validating configuration can fail. The simulation itself
//! contains every fault locally and never returns an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, saving or validating [`crate::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file could not be read or written
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings JSON is malformed
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
