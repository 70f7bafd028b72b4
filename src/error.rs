//! Error types for configuration loading and log output.
//!
//! The battle simulation itself cannot fail; only the edges that touch files
//! and user input return these.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file could not be read or written.
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A RON roster file is malformed.
    #[error("Failed to parse RON file '{}': {source}", path.display())]
    Ron {
        path: PathBuf,
        source: ron::error::SpannedError,
    },

    /// A JSON document is malformed or could not be produced.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A name that is not in the roster.
    #[error("Unknown agent configuration '{name}'. Available: {available}")]
    UnknownAgent { name: String, available: String },

    /// Values that parse but are out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}
