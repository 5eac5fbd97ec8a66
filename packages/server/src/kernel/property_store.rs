//! Flat key-value property storage.
//!
//! Holds credentials, the debug-logging flag and debug log entries. Two
//! implementations: in-memory for tests and a JSON file shared between the
//! server and the `properties` CLI.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::common::PipelineError;
use crate::kernel::BasePropertyStore;

pub const NOTION_TOKEN: &str = "NOTION_TOKEN";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const LOGGING_ENABLED: &str = "LOGGING_ENABLED";

/// Prefix reserved for debug log entries.
pub const LOG_KEY_PREFIX: &str = "log_";

/// Read a credential. Absent or blank values are a configuration error.
pub async fn require_property(store: &dyn BasePropertyStore, key: &'static str) -> Result<String> {
    match store.get(key).await? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PipelineError::Configuration { key }.into()),
    }
}

// =============================================================================
// In-memory
// =============================================================================

#[derive(Default)]
pub struct MemoryPropertyStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed entries up front (tests).
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl BasePropertyStore for MemoryPropertyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

// =============================================================================
// JSON file
// =============================================================================

/// Properties persisted as a single JSON object.
///
/// Every operation re-reads the file so that separate processes observe each
/// other's writes. Writes within one process are serialized; across processes
/// the last writer wins.
pub struct FilePropertyStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePropertyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("Invalid property file {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read property file {}", self.path.display())),
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), count = entries.len(), "Property file saved");
        Ok(())
    }

    async fn modify<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        f(&mut entries);
        self.save(&entries).await
    }
}

#[async_trait]
impl BasePropertyStore for FilePropertyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.modify(|entries| {
            entries.remove(key);
        })
        .await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.load().await?.into_keys().collect())
    }
}
