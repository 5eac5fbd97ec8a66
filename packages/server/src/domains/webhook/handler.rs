//! Webhook orchestration: payload → page content → comment → Notion.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use super::content::extract_content;
use super::generator::generate_comment;
use super::payload::{extract_document_id, extract_title};
use super::publisher::publish_comment;
use crate::kernel::ServerDeps;

pub const MISSING_PAGE_ID: &str = "ページIDが見つかりません";
pub const MISSING_TITLE_OR_BODY: &str = "タイトルまたは本文が見つかりません";
pub const COMMENT_POSTED: &str = "コメントがNotionに投稿されました";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// JSON envelope returned for every webhook call. Failures are reported
/// here, never through the HTTP status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub message: String,
}

impl WebhookResponse {
    pub fn success(comment: String) -> Self {
        Self {
            status: ResponseStatus::Success,
            comment: Some(comment),
            message: COMMENT_POSTED.to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            comment: None,
            message: message.into(),
        }
    }
}

/// Run the whole pipeline for one raw request body. Never fails: every error
/// is written to the debug log and turned into an error envelope.
///
/// Checks run in order id, title, body. The page body is fetched only after a
/// title was found, so a title-less payload makes no Notion call and leaves no
/// content-fetch entry in the debug log.
pub async fn handle_webhook(deps: &ServerDeps, raw_body: &str) -> WebhookResponse {
    match process(deps, raw_body).await {
        Ok(response) => response,
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "Webhook processing failed");
            deps.debug_log
                .write(&format!("エラーが発生しました: {message}"))
                .await;
            WebhookResponse::error(message)
        }
    }
}

async fn process(deps: &ServerDeps, raw_body: &str) -> Result<WebhookResponse> {
    let payload: Value =
        serde_json::from_str(raw_body).context("リクエストボディのJSONを解析できません")?;

    deps.debug_log
        .write(&format!("content: {}", serde_json::to_string_pretty(&payload)?))
        .await;

    let Some(page_id) = extract_document_id(&payload) else {
        return Ok(short_circuit(deps, MISSING_PAGE_ID).await);
    };

    let Some(title) = extract_title(&payload) else {
        return Ok(short_circuit(deps, MISSING_TITLE_OR_BODY).await);
    };
    let Some(body) = extract_content(deps, &payload).await else {
        return Ok(short_circuit(deps, MISSING_TITLE_OR_BODY).await);
    };

    let comment = generate_comment(deps, &title, &body).await?;
    publish_comment(deps, &page_id, &comment).await?;

    info!(page_id = %page_id, comment = %comment, "Generated comment posted");
    Ok(WebhookResponse::success(comment))
}

async fn short_circuit(deps: &ServerDeps, message: &str) -> WebhookResponse {
    warn!(reason = message, "Webhook skipped");
    deps.debug_log.write(message).await;
    WebhookResponse::error(message)
}
