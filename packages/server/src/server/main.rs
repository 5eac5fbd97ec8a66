// Main entry point for the webhook server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::kernel::{
    BasePropertyStore, FilePropertyStore, GEMINI_API_KEY, NOTION_TOKEN,
};
use server_core::server::{build_app, build_deps};
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Notion comment webhook server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        property_store = %config.property_store_path.display(),
        model = %config.gemini_model,
        "Configuration loaded"
    );

    let properties: Arc<dyn BasePropertyStore> =
        Arc::new(FilePropertyStore::new(&config.property_store_path));

    // Environment credentials take precedence over stored ones
    for (key, value) in [
        (NOTION_TOKEN, &config.notion_token),
        (GEMINI_API_KEY, &config.gemini_api_key),
    ] {
        if let Some(value) = value {
            properties
                .set(key, value)
                .await
                .with_context(|| format!("Failed to seed {key} into property store"))?;
            tracing::info!(key, "Credential seeded from environment");
        }
    }

    let app = build_app(build_deps(&config, properties));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Webhook endpoint: http://localhost:{}/webhook", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
