//! Application configuration loading.

use crate::paths::StorywellPaths;
use crate::storage::AtomicTomlFile;
use std::path::PathBuf;
use storywell_core::config::AppConfig;
use storywell_core::error::Result;

/// Loads `config.toml`, writing a default one on first run.
pub struct ConfigService {
    file: AtomicTomlFile<AppConfig>,
}

impl ConfigService {
    pub fn new(paths: &StorywellPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn load(&self) -> Result<AppConfig> {
        if let Some(config) = self.file.load()? {
            return Ok(config);
        }

        let config = AppConfig::default();
        match self.file.save(&config) {
            Ok(()) => tracing::info!(
                "[Config] Created default configuration at {}",
                self.file.path().display()
            ),
            Err(e) => tracing::warn!("[Config] Could not write default configuration: {}", e),
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use storywell_core::authorization::DeploymentMode;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = ConfigService::with_path(path.clone()).load().unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_existing_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[deployment]
host = "preview-7.scf.usercontent.goog"
current_url = "https://preview-7.scf.usercontent.goog/"

[assistant]
request_timeout_secs = 15
"#,
        )
        .unwrap();

        let config = ConfigService::with_path(path).load().unwrap();
        assert_eq!(config.deployment.mode(), DeploymentMode::Restricted);
        assert_eq!(config.assistant.request_timeout_secs, 15);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[deployment\n").unwrap();

        let err = ConfigService::with_path(path).load().unwrap_err();
        assert!(err.is_serialization());
    }
}
