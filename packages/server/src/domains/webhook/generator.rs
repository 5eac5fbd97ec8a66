//! Reaction comment generation.

use anyhow::{Context, Result};
use tracing::{debug, error};

use crate::kernel::{require_property, ServerDeps, GEMINI_API_KEY};

/// Prompt asking for a Japanese reaction comment on the article.
pub fn build_prompt(title: &str, body: &str) -> String {
    format!(
        "以下の記事について、建設的で有益なコメントを日本語で生成してください。

タイトル: {title}

本文:
{body}

コメントは以下の点を考慮してください:
- かわいく
- 鋭く
- ツッコんで

コメントのみを生成してください。"
    )
}

/// Ask the language model for a comment on `title` / `body`.
///
/// A missing `GEMINI_API_KEY` fails before any request is made. The model's
/// text is returned as-is.
pub async fn generate_comment(deps: &ServerDeps, title: &str, body: &str) -> Result<String> {
    let api_key = require_property(deps.properties.as_ref(), GEMINI_API_KEY).await?;

    let prompt = build_prompt(title, body);
    debug!(prompt_chars = prompt.chars().count(), "Requesting comment generation");

    deps.ai
        .complete(&api_key, &prompt)
        .await
        .inspect_err(|e| error!(error = %e, "Gemini API error"))
        .context("コメント生成に失敗しました")
}
