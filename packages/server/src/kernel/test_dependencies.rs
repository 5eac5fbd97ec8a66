// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use notion_client::BlockList;
use std::sync::{Arc, Mutex};

use super::{
    BaseAI, BaseDocumentService, MemoryPropertyStore, ServerDeps, GEMINI_API_KEY, NOTION_TOKEN,
};
use crate::common::PipelineError;

// =============================================================================
// Mock Document Service
// =============================================================================

/// Arguments captured from a create_comment call
#[derive(Debug, Clone, PartialEq)]
pub struct CommentCall {
    pub token: String,
    pub page_id: String,
    pub text: String,
}

pub struct MockDocumentService {
    block_responses: Mutex<Vec<std::result::Result<BlockList, PipelineError>>>,
    comment_responses: Mutex<Vec<std::result::Result<(), PipelineError>>>,
    list_calls: Mutex<Vec<String>>,
    comment_calls: Mutex<Vec<CommentCall>>,
}

impl MockDocumentService {
    pub fn new() -> Self {
        Self {
            block_responses: Mutex::new(Vec::new()),
            comment_responses: Mutex::new(Vec::new()),
            list_calls: Mutex::new(Vec::new()),
            comment_calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a block listing built from paragraph texts (one text run each)
    pub fn with_paragraphs(self, paragraphs: &[&str]) -> Self {
        let results: Vec<serde_json::Value> = paragraphs
            .iter()
            .map(|text| {
                serde_json::json!({
                    "type": "paragraph",
                    "paragraph": {"rich_text": [{"type": "text", "text": {"content": text}}]}
                })
            })
            .collect();
        let blocks = serde_json::from_value(serde_json::json!({ "results": results }))
            .expect("Mock block listing should deserialize");
        self.with_blocks(blocks)
    }

    pub fn with_blocks(self, blocks: BlockList) -> Self {
        self.block_responses.lock().unwrap().push(Ok(blocks));
        self
    }

    /// Queue a non-200 answer for the next block listing
    pub fn with_list_status(self, status: u16, body: &str) -> Self {
        self.block_responses
            .lock()
            .unwrap()
            .push(Err(PipelineError::UpstreamHttp {
                operation: "ページの本文取得",
                status,
                body: body.to_string(),
            }));
        self
    }

    /// Queue a non-200 answer for the next comment post
    pub fn with_comment_status(self, status: u16, body: &str) -> Self {
        self.comment_responses
            .lock()
            .unwrap()
            .push(Err(PipelineError::UpstreamHttp {
                operation: "Notionへのコメント投稿",
                status,
                body: body.to_string(),
            }));
        self
    }

    /// Page ids whose children were listed
    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn comment_calls(&self) -> Vec<CommentCall> {
        self.comment_calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len() + self.comment_calls.lock().unwrap().len()
    }
}

impl Default for MockDocumentService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDocumentService for MockDocumentService {
    async fn list_block_children(&self, _token: &str, page_id: &str) -> Result<BlockList> {
        self.list_calls.lock().unwrap().push(page_id.to_string());

        let mut responses = self.block_responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(BlockList::default());
        }
        responses.remove(0).map_err(Into::into)
    }

    async fn create_comment(&self, token: &str, page_id: &str, text: &str) -> Result<()> {
        self.comment_calls.lock().unwrap().push(CommentCall {
            token: token.to_string(),
            page_id: page_id.to_string(),
            text: text.to_string(),
        });

        let mut responses = self.comment_responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(());
        }
        responses.remove(0).map_err(Into::into)
    }
}

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

pub struct MockAI {
    responses: Mutex<Vec<std::result::Result<String, PipelineError>>>,
    calls: Mutex<Vec<String>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(response.into()));
        self
    }

    /// Add a failure to the queue
    pub fn with_error(self, error: PipelineError) -> Self {
        self.responses.lock().unwrap().push(Err(error));
        self
    }

    /// Get the last prompt sent to the AI
    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, _api_key: &str, prompt: &str) -> Result<String> {
        // Record the call
        self.calls.lock().unwrap().push(prompt.to_string());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok("Mock AI response".to_string());
        }
        responses.remove(0).map_err(Into::into)
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub properties: Arc<MemoryPropertyStore>,
    pub documents: Arc<MockDocumentService>,
    pub ai: Arc<MockAI>,
}

impl TestDependencies {
    /// Mocks plus a property store holding both credentials
    pub fn new() -> Self {
        Self {
            properties: Arc::new(MemoryPropertyStore::with_entries([
                (NOTION_TOKEN, "test-notion-token"),
                (GEMINI_API_KEY, "test-gemini-key"),
            ])),
            documents: Arc::new(MockDocumentService::new()),
            ai: Arc::new(MockAI::new()),
        }
    }

    pub fn mock_properties(mut self, properties: MemoryPropertyStore) -> Self {
        self.properties = Arc::new(properties);
        self
    }

    pub fn mock_documents(mut self, documents: MockDocumentService) -> Self {
        self.documents = Arc::new(documents);
        self
    }

    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Build ServerDeps sharing the mocks, so calls stay observable
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.properties.clone(),
            self.documents.clone(),
            self.ai.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
