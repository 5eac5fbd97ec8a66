//! Notion page webhook → Gemini reaction comment.

pub mod content;
pub mod generator;
pub mod handler;
pub mod payload;
pub mod publisher;

pub use content::{extract_content, fetch_document_text, flatten_paragraphs};
pub use generator::{build_prompt, generate_comment};
pub use handler::{handle_webhook, ResponseStatus, WebhookResponse};
pub use payload::{extract_document_id, extract_title};
pub use publisher::publish_comment;
