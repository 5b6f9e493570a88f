//! Error types for Docflow.
//!
//! Library crates use [`DocflowError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Parse ambiguity in user-authored markdown is never an error: the
//! parsers fall back to treat-as-absent so imperfect documents still
//! produce a usable model. The variants here cover the surrounding
//! concerns, configuration and I/O at the app boundary.

use std::path::PathBuf;

/// Top-level error type for all Docflow operations.
#[derive(Debug, thiserror::Error)]
pub enum DocflowError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocflowError>;

impl DocflowError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocflowError::config("missing config file");
        assert_eq!(err.to_string(), "config error: missing config file");

        let err = DocflowError::io(
            "/tmp/docflow.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("docflow.toml"));
    }
}
