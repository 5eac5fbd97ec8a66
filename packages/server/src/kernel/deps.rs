//! Server dependencies for the webhook pipeline (using traits for testability)
//!
//! All external services use trait abstractions so the pipeline can run
//! against mocks in tests.

use anyhow::Result;
use async_trait::async_trait;
use gemini_client::GeminiClient;
use notion_client::{BlockList, NotionClient};
use reqwest::Client;
use std::sync::Arc;

use crate::common::PipelineError;
use crate::domains::debug_log::DebugLogStore;
use crate::kernel::{BaseAI, BaseDocumentService, BasePropertyStore};

// =============================================================================
// NotionClient Adapter (implements BaseDocumentService trait)
// =============================================================================

/// Builds a `NotionClient` per call around a shared connection pool, since the
/// token is only known at call time.
pub struct NotionAdapter {
    http_client: Client,
    base_url: String,
    version: String,
}

impl NotionAdapter {
    pub fn new(http_client: Client, base_url: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            version: version.into(),
        }
    }

    fn client(&self, token: &str) -> NotionClient {
        NotionClient::with_http_client(self.http_client.clone(), token)
            .with_base_url(self.base_url.as_str())
            .with_version(self.version.as_str())
    }
}

#[async_trait]
impl BaseDocumentService for NotionAdapter {
    async fn list_block_children(&self, token: &str, page_id: &str) -> Result<BlockList> {
        self.client(token)
            .list_block_children(page_id)
            .await
            .map_err(|e| PipelineError::from_notion("ページの本文取得", e).into())
    }

    async fn create_comment(&self, token: &str, page_id: &str, text: &str) -> Result<()> {
        self.client(token)
            .create_comment(page_id, text)
            .await
            .map_err(|e| PipelineError::from_notion("Notionへのコメント投稿", e).into())
    }
}

// =============================================================================
// GeminiClient Adapter (implements BaseAI trait)
// =============================================================================

pub struct GeminiAdapter {
    http_client: Client,
    base_url: String,
    model: String,
}

impl GeminiAdapter {
    pub fn new(http_client: Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseAI for GeminiAdapter {
    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String> {
        GeminiClient::with_http_client(self.http_client.clone(), api_key)
            .with_base_url(self.base_url.as_str())
            .with_model(self.model.as_str())
            .generate_text(prompt)
            .await
            .map_err(|e| PipelineError::from_gemini(e).into())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by every webhook invocation
#[derive(Clone)]
pub struct ServerDeps {
    /// Credentials, logging flag and debug log entries
    pub properties: Arc<dyn BasePropertyStore>,
    pub documents: Arc<dyn BaseDocumentService>,
    pub ai: Arc<dyn BaseAI>,
    pub debug_log: DebugLogStore,
}

impl ServerDeps {
    pub fn new(
        properties: Arc<dyn BasePropertyStore>,
        documents: Arc<dyn BaseDocumentService>,
        ai: Arc<dyn BaseAI>,
    ) -> Self {
        Self {
            debug_log: DebugLogStore::new(properties.clone()),
            properties,
            documents,
            ai,
        }
    }
}
