//! Error types for the chat client.

use thiserror::Error;

/// Result type for chat client operations.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Chat client errors.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration error (missing API key, invalid base URL)
    #[error("configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, body read failed mid-stream)
    #[error("network error: {0}")]
    Network(String),

    /// API error (non-2xx response, provider-side failure)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, invalid UTF-8 in the event stream)
    #[error("parse error: {0}")]
    Parse(String),
}
