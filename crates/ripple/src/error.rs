//! Error types for ripple operations.
//!
//! Errors are split the way indexing tools usually split them:
//!
//! - **`Error`**: run-level failures that stop the analysis (unreadable
//!   project root, invalid explicit configuration, runtime failures)
//! - **`ExtractError`**: per-file failures that are collected and reported but
//!   never stop graph construction
//!
//! Everything else degrades instead of failing: a failed diff is an empty
//! change set, a failed advisory call is a fixed fallback text, and a failed
//! report write is a log line.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for ripple operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for ripple operations.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// A background task panicked or was cancelled
    #[error("task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// JSON serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error encountered while extracting a single source file.
#[derive(Debug, Clone)]
pub struct ExtractError {
    /// Path to the file that failed
    pub path: PathBuf,
    /// Category of the error
    pub kind: ExtractErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.message,
            self.kind
        )
    }
}

impl std::error::Error for ExtractError {}

/// Categorization of extraction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractErrorKind {
    /// Source file has syntax errors
    ParseFailed,

    /// File content is not valid UTF-8
    EncodingError,

    /// Could not read the file from disk
    IoError,
}

impl std::fmt::Display for ExtractErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailed => write!(f, "parse failed"),
            Self::EncodingError => write!(f, "encoding error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl ExtractError {
    /// Create a new extraction error.
    #[must_use]
    pub fn new(path: PathBuf, kind: ExtractErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Create a parse error for a file.
    #[must_use]
    pub fn parse_failed(path: PathBuf, message: impl Into<String>) -> Self {
        Self::new(path, ExtractErrorKind::ParseFailed, message)
    }

    /// Create an encoding error for a file.
    #[must_use]
    pub fn encoding_error(path: PathBuf) -> Self {
        Self::new(path, ExtractErrorKind::EncodingError, "file is not valid UTF-8")
    }

    /// Create an I/O error for a file.
    #[must_use]
    pub fn io_error(path: PathBuf, error: &std::io::Error) -> Self {
        Self::new(path, ExtractErrorKind::IoError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_error_display_includes_path_and_kind() {
        let error = ExtractError::parse_failed(
            PathBuf::from("src/main/java/Broken.java"),
            "syntax error at line 3",
        );

        let display = error.to_string();
        assert!(display.contains("Broken.java"));
        assert!(display.contains("syntax error at line 3"));
        assert!(display.contains("parse failed"));
    }
}
