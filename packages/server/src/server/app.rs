//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::{BasePropertyStore, GeminiAdapter, NotionAdapter, ServerDeps};
use crate::server::routes::{health_handler, webhook_handler};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: ServerDeps,
}

/// Wire the real Notion and Gemini adapters around one HTTP connection pool.
pub fn build_deps(config: &Config, properties: Arc<dyn BasePropertyStore>) -> ServerDeps {
    let http_client = reqwest::Client::new();

    let documents = Arc::new(NotionAdapter::new(
        http_client.clone(),
        config.notion_api_base_url.as_str(),
        config.notion_version.as_str(),
    ));
    let ai = Arc::new(GeminiAdapter::new(
        http_client,
        config.gemini_api_base_url.as_str(),
        config.gemini_model.as_str(),
    ));

    ServerDeps::new(properties, documents, ai)
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .layer(Extension(AxumAppState { deps }))
        .layer(TraceLayer::new_for_http())
}
