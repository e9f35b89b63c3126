//! Error types for row streams.

use thiserror::Error;

/// Result type for stream operations
pub type Result<T> = std::result::Result<T, StreamError>;

/// Errors raised while draining a row payload
#[derive(Debug, Error)]
pub enum StreamError {
    /// IO error from the backing reader
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be decoded from its source
    #[error("Decode error: {0}")]
    Decode(String),
}
