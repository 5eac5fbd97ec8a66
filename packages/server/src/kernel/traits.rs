// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (prompt building, content flattening, envelopes) lives in
// domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BasePropertyStore)

use anyhow::Result;
use async_trait::async_trait;
use notion_client::BlockList;

// =============================================================================
// Property Store Trait (Infrastructure - flat key-value settings)
// =============================================================================

#[async_trait]
pub trait BasePropertyStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a single key
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// All keys currently stored, in ascending order
    async fn keys(&self) -> Result<Vec<String>>;

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .keys()
            .await?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }
}

// =============================================================================
// Document Service Trait (Infrastructure - workspace API)
// =============================================================================

/// Workspace document API. The bearer token is passed per call because it is
/// read from the property store on every use.
#[async_trait]
pub trait BaseDocumentService: Send + Sync {
    /// List the child content blocks of a document
    async fn list_block_children(&self, token: &str, page_id: &str) -> Result<BlockList>;

    /// Post a plain-text comment on a document
    async fn create_comment(&self, token: &str, page_id: &str, text: &str) -> Result<()>;
}

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String>;
}
