use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// Credentials are not part of this struct at runtime: they live in the
/// property store and are read on every use. `NOTION_TOKEN` and
/// `GEMINI_API_KEY` from the environment are only used to seed that store.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub property_store_path: PathBuf,
    pub notion_api_base_url: String,
    pub notion_version: String,
    pub gemini_api_base_url: String,
    pub gemini_model: String,
    pub notion_token: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            property_store_path: env::var("PROPERTY_STORE_PATH")
                .unwrap_or_else(|_| "properties.json".to_string())
                .into(),
            notion_api_base_url: env::var("NOTION_API_BASE_URL")
                .unwrap_or_else(|_| notion_client::DEFAULT_BASE_URL.to_string()),
            notion_version: env::var("NOTION_VERSION")
                .unwrap_or_else(|_| notion_client::DEFAULT_NOTION_VERSION.to_string()),
            gemini_api_base_url: env::var("GEMINI_API_BASE_URL")
                .unwrap_or_else(|_| gemini_client::DEFAULT_BASE_URL.to_string()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| gemini_client::DEFAULT_MODEL.to_string()),
            notion_token: non_empty_var("NOTION_TOKEN"),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
