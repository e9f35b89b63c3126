//! Error types for codec lookup and execution.

use std::fmt;

use tabio_stream::StreamError;
use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// The direction a codec is needed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Parsing bytes into rows
    Read,
    /// Rendering rows into bytes
    Write,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Errors that can occur while resolving or running a codec
#[derive(Debug, Error)]
pub enum CodecError {
    /// No known token matches the file name or type hint
    #[error("Unsupported file type '{extension}' for {action}")]
    UnsupportedFileType { extension: String, action: Action },

    /// The token is known but its codec could not be materialized
    #[error("No codec available for '{token}': {reason}")]
    NoCodec { token: String, reason: String },

    /// A codec option has an unusable value
    #[error("Invalid option '{name}': {message}")]
    InvalidOption { name: String, message: String },

    /// The format holds one sheet but the book has several
    #[error("Format '{token}' holds a single sheet, got {sheets}")]
    SingleSheetOnly { token: String, sheets: usize },

    /// CSV reader/writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading or writing a ZIP archive
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet workbook error
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised while draining rows
    #[error(transparent)]
    Stream(#[from] StreamError),
}

#[cfg(feature = "excel")]
impl From<calamine::Error> for CodecError {
    fn from(err: calamine::Error) -> Self {
        CodecError::Spreadsheet(err.to_string())
    }
}
