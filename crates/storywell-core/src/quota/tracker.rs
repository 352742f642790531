//! Process-local quota tracking.

use super::model::ClientQuota;
use super::store::QuotaStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Holds the usage count for the lifetime of the process.
///
/// The count is read from the [`QuotaStore`] once, at construction, and every
/// successful increment is written back. Only restricted deployments consult
/// the tracker; owner deployments never touch it.
#[derive(Clone)]
pub struct QuotaTracker {
    /// In-memory quota. Authoritative for the running session.
    quota: Arc<Mutex<ClientQuota>>,
    store: Arc<dyn QuotaStore>,
}

impl QuotaTracker {
    /// Loads the stored count, falling back to 0 when it is missing,
    /// unparsable, or cannot be read.
    pub async fn load(store: Arc<dyn QuotaStore>) -> Self {
        let raw = match store.load_count().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("[Quota] Failed to read stored usage count, starting at 0: {}", e);
                None
            }
        };
        let quota = ClientQuota::from_stored(raw.as_deref());
        tracing::debug!(count = quota.count, limit = quota.limit, "[Quota] Loaded");

        Self {
            quota: Arc::new(Mutex::new(quota)),
            store,
        }
    }

    /// Creates a tracker with a known starting quota without reading the store.
    pub fn with_quota(quota: ClientQuota, store: Arc<dyn QuotaStore>) -> Self {
        Self {
            quota: Arc::new(Mutex::new(quota)),
            store,
        }
    }

    pub async fn snapshot(&self) -> ClientQuota {
        *self.quota.lock().await
    }

    pub async fn remaining(&self) -> u32 {
        self.quota.lock().await.remaining()
    }

    pub async fn is_exhausted(&self) -> bool {
        self.quota.lock().await.is_exhausted()
    }

    /// Counts one successful AI response and persists the new count.
    ///
    /// A failed write is logged and otherwise ignored; the in-memory count is
    /// updated either way.
    pub async fn record_success(&self) -> ClientQuota {
        let mut quota = self.quota.lock().await;
        let updated = quota.incremented();

        if let Err(e) = self.store.save_count(&updated.to_stored()).await {
            tracing::warn!(
                count = updated.count,
                "[Quota] Failed to persist usage count: {}",
                e
            );
        }

        *quota = updated;
        tracing::info!(
            count = updated.count,
            remaining = updated.remaining(),
            "[Quota] Recorded successful AI call"
        );
        updated
    }
}
