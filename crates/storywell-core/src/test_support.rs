//! Fakes shared by the unit tests of this crate.

use crate::assistant::{
    AssistantAccess, AssistantGateway, GenerationOptions, GenerationOutcome, GenerationRequest,
};
use crate::authorization::DeploymentMode;
use crate::error::Result;
use crate::quota::{ClientQuota, QuotaStore, QuotaTracker};
use crate::settings::{SettingsRepository, SettingsService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub struct MemorySettingsRepository {
    url: Mutex<String>,
}

impl MemorySettingsRepository {
    pub fn new(url: &str) -> Self {
        Self {
            url: Mutex::new(url.to_string()),
        }
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsRepository {
    async fn read_authorized_url(&self) -> Result<String> {
        Ok(self.url.lock().unwrap().clone())
    }

    async fn write_authorized_url(&self, url: &str) -> Result<()> {
        *self.url.lock().unwrap() = url.to_string();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryQuotaStore {
    value: Mutex<Option<String>>,
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn load_count(&self) -> Result<Option<String>> {
        Ok(self.value.lock().unwrap().clone())
    }

    async fn save_count(&self, value: &str) -> Result<()> {
        *self.value.lock().unwrap() = Some(value.to_string());
        Ok(())
    }
}

/// Gateway that replays queued outcomes and records what it was asked.
pub struct ScriptedGateway {
    outcomes: Mutex<VecDeque<GenerationOutcome>>,
    fallback: Option<GenerationOutcome>,
    requests: Mutex<Vec<GenerationRequest>>,
    calls: AtomicUsize,
    hold: Option<Arc<Notify>>,
}

impl ScriptedGateway {
    pub fn new(outcomes: Vec<GenerationOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            hold: None,
        }
    }

    /// Always answers with `text`.
    pub fn replying(text: &str) -> Self {
        let mut gateway = Self::new(Vec::new());
        gateway.fallback = Some(GenerationOutcome::Text(text.to_string()));
        gateway
    }

    /// Blocks every call until `release` is notified.
    pub fn held_until(mut self, release: Arc<Notify>) -> Self {
        self.hold = Some(release);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AssistantGateway for ScriptedGateway {
    async fn generate(
        &self,
        request: &GenerationRequest,
        _options: &GenerationOptions,
    ) -> GenerationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(release) = &self.hold {
            release.notified().await;
        }

        let queued = self.outcomes.lock().unwrap().pop_front();
        queued
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| GenerationOutcome::from_text(None))
    }
}

/// Access gate over in-memory settings and a quota starting at `count`.
pub async fn build_access(
    mode: DeploymentMode,
    authorized_url: &str,
    current_url: &str,
    count: u32,
) -> (AssistantAccess, QuotaTracker) {
    let settings = Arc::new(SettingsService::new(Arc::new(
        MemorySettingsRepository::new(authorized_url),
    )));
    let quota = QuotaTracker::with_quota(
        ClientQuota::with_count(count),
        Arc::new(MemoryQuotaStore::default()),
    );
    let access = AssistantAccess::new(mode, current_url, settings, quota.clone());
    (access, quota)
}
