//! Document body retrieval.

use anyhow::Result;
use notion_client::BlockList;
use serde_json::Value;
use tracing::{debug, warn};

use super::payload::extract_document_id;
use crate::kernel::{require_property, ServerDeps, NOTION_TOKEN};

/// Body text of the document referenced by the payload.
///
/// Returns `None` when the payload has no page id, when the document has no
/// paragraph text, or when fetching failed. Failures are written to the debug
/// log and otherwise swallowed.
pub async fn extract_content(deps: &ServerDeps, payload: &Value) -> Option<String> {
    let page_id = extract_document_id(payload)?;

    match fetch_document_text(deps, &page_id).await {
        Ok(Some(text)) => Some(text),
        Ok(None) => {
            warn!(page_id = %page_id, "No paragraph content found on page");
            None
        }
        Err(e) => {
            warn!(page_id = %page_id, error = %format!("{e:#}"), "Failed to extract page content");
            deps.debug_log
                .write(&format!("本文抽出エラー: {e:#} - pageId: {page_id}"))
                .await;
            None
        }
    }
}

/// Fetch the page's child blocks and flatten their paragraph text.
pub async fn fetch_document_text(deps: &ServerDeps, page_id: &str) -> Result<Option<String>> {
    let token = require_property(deps.properties.as_ref(), NOTION_TOKEN).await?;

    let blocks = deps.documents.list_block_children(&token, page_id).await?;

    debug!(page_id, blocks = blocks.results.len(), "Fetched page blocks");
    Ok(flatten_paragraphs(&blocks))
}

/// Every text run of every paragraph block, each followed by a newline, trimmed.
pub fn flatten_paragraphs(blocks: &BlockList) -> Option<String> {
    let mut content = String::new();
    for block in &blocks.results {
        for text in block.paragraph_texts() {
            content.push_str(text);
            content.push('\n');
        }
    }

    let trimmed = content.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{MemoryPropertyStore, MockDocumentService, TestDependencies};
    use serde_json::json;

    fn blocks(value: Value) -> BlockList {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flatten_joins_paragraphs_with_newlines() {
        let list = blocks(json!({"results": [
            {"type": "paragraph", "paragraph": {"rich_text": [{"type": "text", "text": {"content": "A"}}]}},
            {"type": "paragraph", "paragraph": {"rich_text": [{"type": "text", "text": {"content": "B"}}]}}
        ]}));

        assert_eq!(flatten_paragraphs(&list).as_deref(), Some("A\nB"));
    }

    #[test]
    fn test_flatten_ignores_other_blocks_and_runs() {
        let list = blocks(json!({"results": [
            {"type": "heading_1", "heading_1": {"rich_text": [{"type": "text", "text": {"content": "H"}}]}},
            {"type": "paragraph", "paragraph": {"rich_text": [
                {"type": "text", "text": {"content": "  one"}},
                {"type": "equation", "equation": {"expression": "x"}},
                {"type": "text", "text": {"content": "two  "}}
            ]}},
            {"type": "paragraph", "paragraph": {"rich_text": []}}
        ]}));

        assert_eq!(flatten_paragraphs(&list).as_deref(), Some("one\ntwo"));
    }

    #[test]
    fn test_flatten_whitespace_only_is_none() {
        let list = blocks(json!({"results": [
            {"type": "paragraph", "paragraph": {"rich_text": [{"type": "text", "text": {"content": "   "}}]}}
        ]}));

        assert_eq!(flatten_paragraphs(&list), None);
        assert_eq!(flatten_paragraphs(&BlockList::default()), None);
    }

    #[tokio::test]
    async fn test_extract_content_fetches_by_page_id() {
        let test_deps = TestDependencies::new()
            .mock_documents(MockDocumentService::new().with_paragraphs(&["Hello", "World"]));
        let deps = test_deps.server_deps();

        let content = extract_content(&deps, &json!({"data": {"id": "p1"}})).await;

        assert_eq!(content.as_deref(), Some("Hello\nWorld"));
        assert_eq!(test_deps.documents.list_calls(), vec!["p1"]);
    }

    #[tokio::test]
    async fn test_extract_content_without_id_makes_no_call() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        assert_eq!(extract_content(&deps, &json!({"data": {}})).await, None);
        assert_eq!(test_deps.documents.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_logged_and_swallowed() {
        let test_deps = TestDependencies::new()
            .mock_documents(MockDocumentService::new().with_list_status(404, "not found"));
        let deps = test_deps.server_deps();
        deps.debug_log.enable().await.unwrap();

        let content = extract_content(&deps, &json!({"data": {"id": "p1"}})).await;
        assert_eq!(content, None);

        let entries = deps.debug_log.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].value.starts_with("本文抽出エラー:"));
        assert!(entries[0].value.contains("ステータスコード: 404"));
        assert!(entries[0].value.ends_with("pageId: p1"));
    }

    #[tokio::test]
    async fn test_missing_token_is_swallowed_without_call() {
        let test_deps = TestDependencies::new().mock_properties(MemoryPropertyStore::new());
        let deps = test_deps.server_deps();

        let err = fetch_document_text(&deps, "p1").await.unwrap_err();
        assert!(err.to_string().contains("NOTION_TOKEN"));

        assert_eq!(extract_content(&deps, &json!({"data": {"id": "p1"}})).await, None);
        assert_eq!(test_deps.documents.call_count(), 0);
    }
}
