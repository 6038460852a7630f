//! Error types for specsift.
//!
//! Library crates use [`SpecsiftError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Almost every error here is recoverable: fetch, parse, and resolution
//! failures for a single page or spec are converted to an absence (skip /
//! `None`) at the boundary of the component that produced them. Only an
//! invalid root URL or a config problem is fatal to a whole run.

use std::path::PathBuf;

/// Top-level error type for all specsift operations.
#[derive(Debug, thiserror::Error)]
pub enum SpecsiftError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// HTTP transport error (network, timeout, non-2xx status).
    #[error("transport error: {0}")]
    Transport(String),

    /// Browser/WebDriver rendering failure.
    #[error("render error: {0}")]
    Render(String),

    /// Neither JSON nor YAML could decode the retrieved text.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A structured value could not be re-encoded as JSON.
    #[error("serialize error: {0}")]
    Serialize(String),

    /// A relative URL could not be joined to its base.
    #[error("resolution error: {message}")]
    Resolution { message: String },

    /// Data validation error (invalid root URL, bad scheme, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SpecsiftError>;

impl SpecsiftError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a resolution error from any displayable message.
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution {
            message: msg.into(),
        }
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
