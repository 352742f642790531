//! TOML-backed settings repository.

use crate::paths::StorywellPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use storywell_core::error::{Result, StorywellError};
use storywell_core::settings::SettingsRepository;

/// On-disk layout of `settings.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    authorized_url: String,
}

/// A [`SettingsRepository`] that stores the settings in `settings.toml`.
///
/// A missing file reads as "no authorized URL".
#[derive(Clone)]
pub struct TomlSettingsRepository {
    file: Arc<AtomicTomlFile<SettingsFile>>,
}

impl TomlSettingsRepository {
    pub fn new(paths: &StorywellPaths) -> Result<Self> {
        Ok(Self::with_path(paths.settings_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }
}

#[async_trait]
impl SettingsRepository for TomlSettingsRepository {
    async fn read_authorized_url(&self) -> Result<String> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || -> Result<String> {
            Ok(file.load()?.unwrap_or_default().authorized_url)
        })
        .await
        .map_err(|e| StorywellError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn write_authorized_url(&self, url: &str) -> Result<()> {
        let file = self.file.clone();
        let url = url.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            file.update(SettingsFile::default(), |settings| {
                settings.authorized_url = url;
            })?;
            Ok(())
        })
        .await
        .map_err(|e| StorywellError::internal(format!("Failed to join task: {}", e)))?
    }
}
