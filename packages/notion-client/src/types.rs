//! Notion API request and response types.
//!
//! Only the fields this crate reads are modelled. Everything else in the
//! payloads is ignored by serde.

use serde::{Deserialize, Serialize};

// =============================================================================
// Blocks
// =============================================================================

/// Response of `GET /v1/blocks/{id}/children`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockList {
    #[serde(default)]
    pub results: Vec<Block>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A single content block. Only paragraph bodies are decoded; a block with no
/// `type` reads as a non-paragraph and contributes nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub paragraph: Option<Paragraph>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

/// A rich-text run as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    #[serde(rename = "type", default)]
    pub text_type: String,
    #[serde(default)]
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub content: String,
}

impl Block {
    /// Plain-text runs of a paragraph block, in order. Empty for other block types.
    pub fn paragraph_texts(&self) -> impl Iterator<Item = &str> {
        let runs: &[RichText] = match (self.block_type.as_str(), &self.paragraph) {
            ("paragraph", Some(p)) => p.rich_text.as_slice(),
            _ => &[],
        };
        runs.iter()
            .filter(|run| run.text_type == "text")
            .filter_map(|run| run.text.as_ref().map(|t| t.content.as_str()))
    }
}

// =============================================================================
// Comments
// =============================================================================

/// Body of `POST /v1/comments`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentRequest {
    pub parent: CommentParent,
    pub rich_text: Vec<RichTextInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentParent {
    pub page_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RichTextInput {
    #[serde(rename = "type")]
    pub text_type: &'static str,
    pub text: TextContent,
}

impl CreateCommentRequest {
    /// A comment on `page_id` consisting of a single plain-text run.
    pub fn plain(page_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            parent: CommentParent {
                page_id: page_id.into(),
            },
            rich_text: vec![RichTextInput {
                text_type: "text",
                text: TextContent {
                    content: content.into(),
                },
            }],
        }
    }
}
