//! Settings service.

use super::repository::SettingsRepository;
use crate::authorization::{AuthorizationConfig, DeploymentMode};
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Reads and updates the authorized URL, remembering the last good value.
///
/// Every authorization check goes through [`Self::authorization_config`],
/// which re-reads the repository. When a read fails the last successfully
/// read value stays in effect. Before any successful read that value is the
/// empty string, so a restricted deployment stays locked.
pub struct SettingsService {
    repository: Arc<dyn SettingsRepository>,
    last_known_url: RwLock<String>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SettingsRepository>) -> Self {
        Self {
            repository,
            last_known_url: RwLock::new(String::new()),
        }
    }

    /// Returns the current authorized URL, falling back to the last known one.
    pub async fn authorized_url(&self) -> String {
        match self.repository.read_authorized_url().await {
            Ok(url) => {
                let mut last = self.last_known_url.write().await;
                last.clone_from(&url);
                url
            }
            Err(e) => {
                tracing::warn!(
                    "[Settings] Failed to read settings, keeping previous authorized URL: {}",
                    e
                );
                self.last_known_url.read().await.clone()
            }
        }
    }

    /// Builds the authorization config for a decision made right now.
    pub async fn authorization_config(&self, mode: DeploymentMode) -> AuthorizationConfig {
        AuthorizationConfig::new(self.authorized_url().await, mode)
    }

    /// Stores a new authorized URL.
    ///
    /// On failure the previous value remains in effect and the error is
    /// returned to the caller.
    pub async fn update_authorized_url(&self, url: &str) -> Result<()> {
        let url = url.trim();
        match self.repository.write_authorized_url(url).await {
            Ok(()) => {
                *self.last_known_url.write().await = url.to_string();
                tracing::info!(authorized_url = %url, "[Settings] Authorized URL updated");
                Ok(())
            }
            Err(e) => {
                tracing::error!("[Settings] Failed to save authorized URL: {}", e);
                Err(e)
            }
        }
    }
}
