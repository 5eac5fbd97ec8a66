//! Test harness: the real router and adapters, with Notion and Gemini
//! replaced by one wiremock server.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use server_core::kernel::{MemoryPropertyStore, GEMINI_API_KEY, NOTION_TOKEN};
use server_core::server::{build_app, build_deps};
use server_core::Config;
use tower::ServiceExt;
use wiremock::MockServer;

pub const TEST_MODEL: &str = "gemini-pro";

pub struct TestHarness {
    pub upstream: MockServer,
    pub properties: Arc<MemoryPropertyStore>,
    pub app: Router,
}

impl TestHarness {
    /// Harness with both credentials configured
    pub async fn new() -> Self {
        Self::with_properties(MemoryPropertyStore::with_entries([
            (NOTION_TOKEN, "secret_test"),
            (GEMINI_API_KEY, "gemini_test"),
        ]))
        .await
    }

    pub async fn with_properties(properties: MemoryPropertyStore) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let upstream = MockServer::start().await;
        let config = Config {
            port: 0,
            property_store_path: "unused.json".into(),
            notion_api_base_url: format!("{}/v1", upstream.uri()),
            notion_version: "2022-06-28".to_string(),
            gemini_api_base_url: format!("{}/v1beta", upstream.uri()),
            gemini_model: TEST_MODEL.to_string(),
            notion_token: None,
            gemini_api_key: None,
        };

        let properties = Arc::new(properties);
        let app = build_app(build_deps(&config, properties.clone()));

        Self {
            upstream,
            properties,
            app,
        }
    }

    /// POST a raw body to /webhook, returning the status and decoded JSON
    pub async fn post_webhook(&self, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .expect("valid request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"), "content-type: {content_type}");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = serde_json::from_slice(&bytes).expect("JSON body");
        (status, json)
    }
}

pub fn page_payload(page_id: &str, title: &str) -> String {
    serde_json::json!({
        "data": {
            "id": page_id,
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": title}]}
            }
        }
    })
    .to_string()
}

pub fn paragraphs(texts: &[&str]) -> Value {
    let results: Vec<Value> = texts
        .iter()
        .map(|text| {
            serde_json::json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": {"rich_text": [{
                    "type": "text",
                    "text": {"content": text},
                    "plain_text": text
                }]}
            })
        })
        .collect();
    serde_json::json!({"object": "list", "results": results, "has_more": false})
}

pub fn gemini_reply(text: &str) -> Value {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
}
