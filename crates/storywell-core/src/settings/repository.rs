//! Settings repository trait.

use crate::error::Result;
use async_trait::async_trait;

/// Persistence for the application settings.
///
/// Decouples the authorization logic from where the settings actually live
/// (a TOML file, a remote settings endpoint, ...).
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Reads the authorized URL.
    ///
    /// # Returns
    ///
    /// - `Ok(url)`: The stored URL, or an empty string if none is set
    /// - `Err(_)`: The settings could not be read
    async fn read_authorized_url(&self) -> Result<String>;

    /// Replaces the authorized URL.
    async fn write_authorized_url(&self, url: &str) -> Result<()>;
}
