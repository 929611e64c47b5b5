//! Error types for dsv-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dsv-core
#[derive(Debug, Error)]
pub enum Error {
    /// Input bytes are not UTF-8 text
    #[error("invalid input: not valid UTF-8 text: {source}")]
    InvalidInput {
        #[source]
        source: std::str::Utf8Error,
    },

    /// A parse option has an unusable value
    #[error("invalid option '{option}': {value:?} ({reason})")]
    InvalidConfig {
        option: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A row disagrees with the first row's field count
    #[error("inconsistent row shape: expected {expected} fields, found {found} in row {row}")]
    InconsistentShape {
        expected: usize,
        found: usize,
        row: usize,
    },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    InvalidConfig,
    InconsistentShape,
    Io,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            // A malformed options document is a configuration problem
            Error::InvalidConfig { .. } | Error::Json(_) => ErrorKind::InvalidConfig,
            Error::InconsistentShape { .. } => ErrorKind::InconsistentShape,
            Error::FileRead { .. } | Error::Io(_) => ErrorKind::Io,
        }
    }
}
