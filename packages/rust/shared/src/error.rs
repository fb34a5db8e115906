//! Error types for contribsync.
//!
//! Library crates use [`ContribSyncError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all contribsync operations.
#[derive(Debug, thiserror::Error)]
pub enum ContribSyncError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error against the listing or profile endpoint.
    #[error("network error: {0}")]
    Network(String),

    /// Malformed response body or corrupt stored snapshot.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// No snapshot has ever been written to the given location.
    #[error("no snapshot found at {path:?}")]
    NotFound { path: PathBuf },

    /// Filesystem I/O error with path context.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Batch-level enrichment failure (an individual lookup never surfaces here).
    #[error("enrichment error: {0}")]
    Enrichment(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ContribSyncError>;

impl ContribSyncError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a decode error from any displayable message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
