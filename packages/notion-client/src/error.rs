//! Error types for the Notion client.

use thiserror::Error;

/// Result type for Notion client operations.
pub type Result<T> = std::result::Result<T, NotionError>;

/// Notion client errors.
#[derive(Debug, Error)]
pub enum NotionError {
    /// Request never produced a response (DNS, connect, TLS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-200 response from the API
    #[error("Notion API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// 200 response whose body does not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}
