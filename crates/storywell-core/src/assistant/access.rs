//! Authorization and quota gate in front of every AI call.

use super::gateway::{AssistantGateway, GenerationOptions, GenerationRequest};
use super::outcome::{AssistantErrorKind, GenerationOutcome};
use crate::authorization::{DeploymentMode, UrlAuthorizer};
use crate::quota::{ClientQuota, QuotaTracker};
use crate::settings::SettingsService;
use std::sync::Arc;

/// Result of asking the gate whether a call may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Granted,
    Denied(AssistantErrorKind),
}

impl Admission {
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Decides whether an AI call may run and accounts for it afterwards.
///
/// Checks run in a fixed order: URL authorization first, then (restricted
/// mode only) the quota. The authorized URL is re-read on every check.
#[derive(Clone)]
pub struct AssistantAccess {
    mode: DeploymentMode,
    current_url: String,
    authorizer: UrlAuthorizer,
    settings: Arc<SettingsService>,
    quota: QuotaTracker,
}

impl AssistantAccess {
    pub fn new(
        mode: DeploymentMode,
        current_url: impl Into<String>,
        settings: Arc<SettingsService>,
        quota: QuotaTracker,
    ) -> Self {
        Self {
            mode,
            current_url: current_url.into(),
            authorizer: UrlAuthorizer::new(),
            settings,
            quota,
        }
    }

    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    pub fn settings(&self) -> &Arc<SettingsService> {
        &self.settings
    }

    /// Current quota, or `None` in owner mode where no quota applies.
    pub async fn quota(&self) -> Option<ClientQuota> {
        if self.mode.is_restricted() {
            Some(self.quota.snapshot().await)
        } else {
            None
        }
    }

    pub async fn is_authorized(&self) -> bool {
        let config = self.settings.authorization_config(self.mode).await;
        self.authorizer.is_authorized(&self.current_url, &config)
    }

    pub async fn admit(&self) -> Admission {
        if !self.is_authorized().await {
            tracing::info!(
                current_url = %self.current_url,
                "[Access] AI call denied: origin not authorized"
            );
            return Admission::Denied(AssistantErrorKind::AuthorizationDenied);
        }

        if self.mode.is_restricted() && self.quota.is_exhausted().await {
            tracing::info!("[Access] AI call denied: usage limit reached");
            return Admission::Denied(AssistantErrorKind::QuotaExceeded);
        }

        Admission::Granted
    }

    /// Accounts for a finished call. Only restricted-mode successes count.
    pub async fn settle(&self, outcome: &GenerationOutcome) {
        if self.mode.is_restricted() && outcome.is_success() {
            self.quota.record_success().await;
        }
    }

    /// Admits, calls the gateway once, and settles.
    ///
    /// A denial is returned as a failed outcome without calling the gateway.
    pub async fn run(
        &self,
        gateway: &dyn AssistantGateway,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> GenerationOutcome {
        if let Admission::Denied(kind) = self.admit().await {
            return GenerationOutcome::failed(kind, kind.to_string());
        }

        let outcome = gateway.generate(request, options).await;
        self.settle(&outcome).await;
        outcome
    }
}
