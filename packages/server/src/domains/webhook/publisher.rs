//! Posting the generated comment back to the page.

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::kernel::{require_property, ServerDeps, NOTION_TOKEN};

/// Post `text` as a comment on `page_id`.
///
/// A missing `NOTION_TOKEN` fails before any request. Every failure of the
/// request itself is wrapped with a fixed prefix.
pub async fn publish_comment(deps: &ServerDeps, page_id: &str, text: &str) -> Result<()> {
    let token = require_property(deps.properties.as_ref(), NOTION_TOKEN).await?;

    deps.documents
        .create_comment(&token, page_id, text)
        .await
        .inspect_err(|e| error!(page_id, error = %e, "Notion API call failed"))
        .context("Notionへのコメント投稿中にエラーが発生しました")?;

    info!(page_id, "Comment posted to Notion page");
    Ok(())
}
