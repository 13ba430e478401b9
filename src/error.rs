//! Error handling utilities shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = LexidError> = std::result::Result<T, E>;

/// Domain-specific error describing failures during configuration, IO, or model operations.
#[derive(Debug, Error)]
pub enum LexidError {
    /// Training or evaluation input failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Filesystem IO error with optional context path.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// Underlying IO error returned by the standard library.
        source: std::io::Error,
        /// Target path associated with the IO failure if available.
        path: Option<PathBuf>,
    },
    /// An operation requiring a trained model ran before training completed.
    #[error("model is not trained: {0}")]
    NotTrained(String),
    /// A corpus or test file could not be decoded as UTF-8 text.
    #[error("encoding error while reading {path:?}")]
    Encoding {
        /// File that failed to decode.
        path: PathBuf,
    },
    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Catch-all variant for invariants that should not occur.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<bincode::Error> for LexidError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for LexidError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl LexidError {
    /// Helper constructor that attaches an optional path when wrapping IO errors.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { source, path }
    }
}
