//! Unified path management for storywell files.
//!
//! Platform directories are resolved via AppPaths from the version-migrate
//! crate. A base directory can be injected instead, which is how tests and
//! the `--data-dir` flag keep everything under one folder.

use std::path::{Path, PathBuf};
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for storywell_core::StorywellError {
    fn from(err: PathError) -> Self {
        storywell_core::StorywellError::config(err.to_string())
    }
}

/// Path layout for storywell.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/storywell/         # Config directory (AppPaths default)
/// ├── config.toml              # Deployment and assistant configuration
/// ├── secret.json              # API keys
/// ├── settings.toml            # Authorized URL
/// ├── local_storage.toml       # Client-local key/value store (usage quota)
/// └── logs/                    # Application logs
///     └── storywell.log.YYYY-MM-DD
/// ```
#[derive(Debug, Clone, Default)]
pub struct StorywellPaths {
    base: Option<PathBuf>,
}

impl StorywellPaths {
    /// Uses `base` as the config directory when given, else the platform default.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    fn app_paths() -> AppPaths {
        AppPaths::new("storywell")
    }

    /// Returns the storywell configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/storywell/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => Self::app_paths()
                .config_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    pub fn settings_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("settings.toml"))
    }

    pub fn local_storage_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("local_storage.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
