//! Quota store trait.

use crate::error::Result;
use async_trait::async_trait;

/// Durable, client-local storage for the usage count.
///
/// The value is the decimal string of the count, kept under
/// [`super::QUOTA_STORAGE_KEY`]. Implementations only move strings; parsing
/// and defaulting happen in [`super::ClientQuota::from_stored`].
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Reads the stored value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: A value is stored
    /// - `Ok(None)`: Nothing stored yet
    /// - `Err(_)`: Storage could not be read
    async fn load_count(&self) -> Result<Option<String>>;

    /// Overwrites the stored value.
    async fn save_count(&self, value: &str) -> Result<()>;
}
