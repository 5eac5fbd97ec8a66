//! Flag-gated debug log kept in the property store.
//!
//! Entries are stored under `log_<RFC 3339 timestamp>` and hold free text.
//! This is a debugging aid for operators, not the application log: it has no
//! levels or fields, and everything else goes through `tracing`.

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::kernel::{BasePropertyStore, LOGGING_ENABLED, LOG_KEY_PREFIX};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub key: String,
    pub value: String,
}

#[derive(Clone)]
pub struct DebugLogStore {
    properties: Arc<dyn BasePropertyStore>,
}

impl DebugLogStore {
    pub fn new(properties: Arc<dyn BasePropertyStore>) -> Self {
        Self { properties }
    }

    pub async fn enable(&self) -> Result<()> {
        self.properties.set(LOGGING_ENABLED, "true").await?;
        info!("Debug logging enabled");
        Ok(())
    }

    pub async fn disable(&self) -> Result<()> {
        self.properties.set(LOGGING_ENABLED, "false").await?;
        info!("Debug logging disabled");
        Ok(())
    }

    /// True only when the flag holds exactly `"true"`.
    pub async fn is_enabled(&self) -> Result<bool> {
        Ok(self.properties.get(LOGGING_ENABLED).await?.as_deref() == Some("true"))
    }

    /// Store `text` under a fresh timestamp key if logging is enabled.
    ///
    /// Two writes within the same nanosecond share a key; the later one wins.
    /// Failures are traced and swallowed.
    pub async fn write(&self, text: &str) {
        if let Err(e) = self.try_write(text).await {
            warn!(error = %e, "Failed to write debug log entry");
        }
    }

    async fn try_write(&self, text: &str) -> Result<()> {
        if !self.is_enabled().await? {
            debug!("Debug logging disabled, skipping entry");
            return Ok(());
        }

        let key = log_key(Utc::now());
        self.properties.set(&key, text).await?;
        debug!(key = %key, "Debug log entry saved");
        Ok(())
    }

    /// All entries, oldest first.
    pub async fn list(&self) -> Result<Vec<LogEntry>> {
        let mut keys = self.properties.keys_with_prefix(LOG_KEY_PREFIX).await?;
        keys.sort();

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            // Skip keys removed between listing and reading
            if let Some(value) = self.properties.get(&key).await? {
                entries.push(LogEntry { key, value });
            }
        }
        Ok(entries)
    }

    /// Delete every entry. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize> {
        let keys = self.properties.keys_with_prefix(LOG_KEY_PREFIX).await?;
        for key in &keys {
            self.properties.delete(key).await?;
        }
        info!(count = keys.len(), "Debug log cleared");
        Ok(keys.len())
    }
}

fn log_key(at: chrono::DateTime<Utc>) -> String {
    format!(
        "{}{}",
        LOG_KEY_PREFIX,
        at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    )
}
