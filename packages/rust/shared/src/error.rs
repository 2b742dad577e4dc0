//! Error types for chulo.
//!
//! Library crates use [`ChuloError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all chulo operations.
#[derive(Debug, thiserror::Error)]
pub enum ChuloError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed notebook JSON or missing required fields.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Structurally invalid notebook content (e.g. a markdown cell without source).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A color palette name that no resolver knows about.
    #[error("unknown color palette '{name}'")]
    Palette { name: String },

    /// The notebook already carries a contents cell or heading anchors.
    #[error("notebook is already annotated (pass --force to annotate it again)")]
    AlreadyAnnotated,
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ChuloError>;

impl ChuloError {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = ChuloError::config("bad suffix");
        assert_eq!(err.to_string(), "config error: bad suffix");

        let err = ChuloError::validation("markdown cell 3 has no source");
        assert!(err.to_string().contains("cell 3"));

        let err = ChuloError::Palette {
            name: "rainbow".into(),
        };
        assert_eq!(err.to_string(), "unknown color palette 'rainbow'");
    }

    #[test]
    fn io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ChuloError::io("nb/lesson.ipynb", source);
        assert!(err.to_string().contains("lesson.ipynb"));
    }
}
