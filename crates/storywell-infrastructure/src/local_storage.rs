//! Client-local key/value storage.
//!
//! A flat string map persisted to `local_storage.toml`, scoped to one
//! installation. The usage quota is its only tenant today.

use crate::paths::StorywellPaths;
use crate::storage::AtomicTomlFile;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use storywell_core::error::{Result, StorywellError};
use storywell_core::quota::{QUOTA_STORAGE_KEY, QuotaStore};

type Entries = BTreeMap<String, String>;

/// String key/value store backed by an atomic TOML file.
///
/// File I/O runs on the blocking pool so async callers are never stalled.
#[derive(Clone)]
pub struct LocalStorage {
    file: Arc<AtomicTomlFile<Entries>>,
}

impl LocalStorage {
    pub fn new(paths: &StorywellPaths) -> Result<Self> {
        Ok(Self::with_path(paths.local_storage_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let file = self.file.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<String>> {
            let entries = file.load()?.unwrap_or_default();
            Ok(entries.get(&key).cloned())
        })
        .await
        .map_err(|e| StorywellError::internal(format!("Failed to join task: {}", e)))?
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let file = self.file.clone();
        let key = key.to_string();
        let value = value.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            file.update(Entries::new(), |entries| {
                entries.insert(key, value);
            })?;
            Ok(())
        })
        .await
        .map_err(|e| StorywellError::internal(format!("Failed to join task: {}", e)))?
    }
}

/// [`QuotaStore`] that keeps the usage count in [`LocalStorage`].
#[derive(Clone)]
pub struct LocalStorageQuotaStore {
    storage: LocalStorage,
}

impl LocalStorageQuotaStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }
}

#[async_trait::async_trait]
impl QuotaStore for LocalStorageQuotaStore {
    async fn load_count(&self) -> Result<Option<String>> {
        self.storage.get_item(QUOTA_STORAGE_KEY).await
    }

    async fn save_count(&self, value: &str) -> Result<()> {
        self.storage.set_item(QUOTA_STORAGE_KEY, value).await
    }
}
