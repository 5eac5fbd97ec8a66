//! Field extraction from the inbound webhook payload.
//!
//! The payload is opaque JSON. Both extractors return `None` when the field is
//! missing, has the wrong type, or is empty; `None` always means "field
//! absent" to the caller and never hides an error.

use serde_json::Value;
use tracing::warn;

/// `data.id`, when it is a non-empty string.
pub fn extract_document_id(payload: &Value) -> Option<String> {
    let id = payload
        .get("data")
        .and_then(|data| data.get("id"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty());

    if id.is_none() {
        warn!(payload = %payload, "Page id not found in webhook payload");
    }
    id.map(str::to_string)
}

/// `plain_text` of the first run of the first `title`-typed property under
/// `data.properties`.
pub fn extract_title(payload: &Value) -> Option<String> {
    let title = payload
        .get("data")
        .and_then(|data| data.get("properties"))
        .and_then(Value::as_object)
        .and_then(|properties| {
            properties
                .values()
                .find(|property| property.get("type").and_then(Value::as_str) == Some("title"))
        })
        .and_then(|property| property.get("title"))
        .and_then(Value::as_array)
        .and_then(|runs| runs.first())
        .and_then(|run| run.get("plain_text"))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty());

    if title.is_none() {
        warn!(payload = %payload, "Title not found in webhook payload");
    }
    title.map(str::to_string)
}
