use axum::{body::Bytes, extract::Extension, Json};

use crate::domains::webhook::{handle_webhook, WebhookResponse};
use crate::server::app::AxumAppState;

/// Notion webhook endpoint
///
/// Always answers 200 with a JSON envelope; success or failure is carried in
/// the `status` field. The body is decoded lossily so that even a non-UTF-8
/// request gets an envelope rather than a rejection.
pub async fn webhook_handler(
    Extension(state): Extension<AxumAppState>,
    body: Bytes,
) -> Json<WebhookResponse> {
    let raw = String::from_utf8_lossy(&body);
    Json(handle_webhook(&state.deps, &raw).await)
}
