//! Error types for source resolution and the read/write facade.

use tabio_codecs::{Action, CodecError};
use tabio_stream::StreamError;
use thiserror::Error;

use crate::capability::Target;

/// Result type for tabio operations
pub type Result<T> = std::result::Result<T, TabioError>;

/// Errors that can occur while resolving a source or moving data
#[derive(Debug, Error)]
pub enum TabioError {
    /// No registered adapter accepts the request
    #[error("No source accepts {request} for {target} {action}")]
    NoMatchingSource {
        target: Target,
        action: Action,
        request: String,
    },

    /// An adapter was registered with an unusable capability
    #[error("Invalid capability for adapter '{adapter}': {message}")]
    InvalidCapability { adapter: String, message: String },

    /// The requested sheet is not in the book
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The adapter was resolved for an action it does not implement
    #[error("Adapter '{adapter}' does not support {action}")]
    UnsupportedAction { adapter: String, action: Action },

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server returned an error
    #[error("Server error ({status}) for {url}")]
    ServerError { status: u16, url: String },

    /// Database table store error
    #[error("Table store error: {0}")]
    Store(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised while draining rows
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Codec lookup or codec failure
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for TabioError {
    fn from(err: reqwest::Error) -> Self {
        TabioError::Http(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for TabioError {
    fn from(err: rusqlite::Error) -> Self {
        TabioError::Store(err.to_string())
    }
}

impl From<toml::de::Error> for TabioError {
    fn from(err: toml::de::Error) -> Self {
        TabioError::Config(err.to_string())
    }
}
