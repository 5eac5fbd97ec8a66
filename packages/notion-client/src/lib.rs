//! Minimal Notion REST API client.
//!
//! Covers the two endpoints needed to react to a page: listing a page's
//! child blocks and posting a comment on it. Every call carries the bearer
//! token and the pinned `Notion-Version` header.
//!
//! # Example
//!
//! ```rust,ignore
//! use notion_client::NotionClient;
//!
//! let client = NotionClient::new("secret_xxx");
//!
//! let blocks = client.list_block_children("page-id").await?;
//! client.create_comment("page-id", "Nice write-up!").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{NotionError, Result};
pub use types::{Block, BlockList, CreateCommentRequest, Paragraph, RichText, TextContent};

use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

#[derive(Clone)]
pub struct NotionClient {
    http_client: Client,
    token: String,
    base_url: String,
    version: String,
}

impl NotionClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), token)
    }

    /// Reuse an existing connection pool.
    pub fn with_http_client(http_client: Client, token: impl Into<String>) -> Self {
        Self {
            http_client,
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_NOTION_VERSION.to_string(),
        }
    }

    /// Set a custom base URL (for proxies and tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Fetch the first page of child blocks of a page or block.
    pub async fn list_block_children(&self, block_id: &str) -> Result<BlockList> {
        let url = format!("{}/blocks/{}/children", self.base_url, block_id);
        let request = self.authorized(self.http_client.get(&url));

        let body = self.send_expecting_ok(request, "list block children").await?;
        let blocks: BlockList = parse_body(&body)?;

        debug!(
            block_id,
            count = blocks.results.len(),
            has_more = blocks.has_more,
            "Fetched Notion block children"
        );
        Ok(blocks)
    }

    /// Post a plain-text comment on a page.
    pub async fn create_comment(&self, page_id: &str, content: &str) -> Result<()> {
        let url = format!("{}/comments", self.base_url);
        let payload = CreateCommentRequest::plain(page_id, content);
        let request = self.authorized(self.http_client.post(&url)).json(&payload);

        let body = self.send_expecting_ok(request, "create comment").await?;
        debug!(page_id, response = %body, "Notion comment created");
        Ok(())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
            .header(header::CONTENT_TYPE, "application/json")
    }

    /// Send the request and return the body text. Only 200 counts as success.
    async fn send_expecting_ok(&self, request: RequestBuilder, operation: &str) -> Result<String> {
        let response = request.send().await.map_err(|e| {
            warn!(operation, error = %e, "Notion request failed");
            NotionError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!(operation, status = status.as_u16(), body = %body, "Notion API error");
            return Err(NotionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| NotionError::Parse(e.to_string()))
}
