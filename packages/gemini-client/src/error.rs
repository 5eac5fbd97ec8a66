//! Error types for the Gemini client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeminiError>;

#[derive(Debug, Error)]
pub enum GeminiError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Body is not valid JSON for the expected type
    #[error("Parse error: {0}")]
    Parse(String),

    /// Well-formed response without a usable candidate
    #[error("No candidate text in Gemini response")]
    EmptyResponse,
}
