//! Error types for Webstash.
//!
//! Library crates use [`WebstashError`] via `thiserror`.
//! The host binary wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Webstash operations.
#[derive(Debug, thiserror::Error)]
pub enum WebstashError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Native-messaging transport error (framing, truncated stream).
    #[error("transport error: {0}")]
    Transport(String),

    /// Request validation error (missing field, wrong type, bad action).
    #[error("{message}")]
    Validation { message: String },

    /// Document-store error (HTTP failure, unexpected response shape).
    #[error("store error: {0}")]
    Store(String),

    /// Persistence sink error (filesystem write, path derivation).
    #[error("sink error: {0}")]
    Sink(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WebstashError>;

impl WebstashError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a transport error from any displayable message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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
