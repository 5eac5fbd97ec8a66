//! CLI for operating on the property store
//!
//! Toggles and inspects the debug log, manages credentials, and can send a
//! sample webhook to a running server.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use server_core::config::Config;
use server_core::domains::debug_log::DebugLogStore;
use server_core::kernel::{BasePropertyStore, FilePropertyStore};

#[derive(Parser)]
#[command(name = "properties")]
#[command(about = "Property store and debug log CLI")]
struct Cli {
    /// Property file (defaults to PROPERTY_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn debug logging on or off
    Logging {
        #[command(subcommand)]
        action: LoggingAction,
    },

    /// Inspect or clear debug log entries
    Logs {
        #[command(subcommand)]
        action: LogsAction,
    },

    /// Same as `logs show`
    #[command(hide = true)]
    ShowErrorLogs,

    /// Same as `logs clear`
    #[command(hide = true)]
    ClearErrorLogs,

    /// Set a property (e.g. NOTION_TOKEN, GEMINI_API_KEY)
    Set { key: String, value: String },

    /// Remove a property
    Unset { key: String },

    /// Post a sample page payload to a running server
    TestWebhook {
        #[arg(long, default_value = "http://localhost:8080/webhook")]
        url: String,
        #[arg(long)]
        page_id: String,
        #[arg(long, default_value = "テスト記事のタイトル")]
        title: String,
    },
}

#[derive(Subcommand)]
enum LoggingAction {
    Enable,
    Disable,
    Status,
}

#[derive(Subcommand)]
enum LogsAction {
    Show,
    Clear,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let path = cli.store.unwrap_or(config.property_store_path);

    let properties: Arc<dyn BasePropertyStore> = Arc::new(FilePropertyStore::new(path));
    let log = DebugLogStore::new(properties.clone());

    match cli.command {
        Commands::Logging { action } => match action {
            LoggingAction::Enable => {
                log.enable().await?;
                println!("ログ書き出しを有効にしました");
            }
            LoggingAction::Disable => {
                log.disable().await?;
                println!("ログ書き出しを無効にしました");
            }
            LoggingAction::Status => {
                let state = if log.is_enabled().await? { "有効" } else { "無効" };
                println!("ログ書き出し: {state}");
            }
        },
        Commands::Logs {
            action: LogsAction::Show,
        }
        | Commands::ShowErrorLogs => show_logs(&log).await?,
        Commands::Logs {
            action: LogsAction::Clear,
        }
        | Commands::ClearErrorLogs => {
            let count = log.clear().await?;
            println!("{count}件のログをクリアしました");
        }
        Commands::Set { key, value } => {
            properties.set(&key, &value).await?;
            println!("{key} を設定しました");
        }
        Commands::Unset { key } => {
            properties.delete(&key).await?;
            println!("{key} を削除しました");
        }
        Commands::TestWebhook {
            url,
            page_id,
            title,
        } => test_webhook(&url, &page_id, &title).await?,
    }

    Ok(())
}

async fn show_logs(log: &DebugLogStore) -> Result<()> {
    let entries = log.list().await?;
    if entries.is_empty() {
        println!("保存されたログはありません");
        return Ok(());
    }

    for entry in entries {
        println!("Key: {}\nValue:\n{}\n---", entry.key, entry.value);
    }
    Ok(())
}

/// The server fetches the body from Notion itself, so the page must be shared
/// with the integration.
async fn test_webhook(url: &str, page_id: &str, title: &str) -> Result<()> {
    let payload = serde_json::json!({
        "data": {
            "id": page_id,
            "properties": {
                "title": {
                    "type": "title",
                    "title": [{"plain_text": title}]
                }
            }
        }
    });

    let response = reqwest::Client::new()
        .post(url)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("Failed to reach {url}"))?;

    let body: serde_json::Value = response
        .json()
        .await
        .context("Server did not answer with JSON")?;
    println!("テスト結果: {}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
