//! Writing Assistant Service
//!
//! Wires the access gate, quota, settings and the provider gateway together
//! and exposes the operations front-ends call: chat sessions, one-shot
//! prompts and the writing tasks.

use crate::prompts::PromptRenderer;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use storywell_core::assistant::{
    AssistantAccess, AssistantErrorKind, AssistantGateway, GenerationOptions, GenerationOutcome,
    GenerationRequest,
};
use storywell_core::authorization::DeploymentMode;
use storywell_core::chat::ChatSession;
use storywell_core::config::AppConfig;
use storywell_core::error::Result;
use storywell_core::quota::{ClientQuota, QuotaStore, QuotaTracker};
use storywell_core::settings::{SettingsRepository, SettingsService};
use storywell_infrastructure::{
    LocalStorage, LocalStorageQuotaStore, SecretStorage, StorywellPaths, TomlSettingsRepository,
};
use storywell_interaction::GeminiAssistant;

/// Snapshot of the assistant's availability, for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantStatus {
    pub mode: DeploymentMode,
    pub current_url: String,
    pub authorized_url: String,
    pub authorized: bool,
    /// `None` in owner mode.
    pub quota: Option<ClientQuota>,
}

/// Gateway used when no provider credentials are configured.
///
/// Every call fails with a provider error, so the app still starts and the
/// user sees why the assistant is silent.
struct UnconfiguredGateway {
    reason: String,
}

#[async_trait]
impl AssistantGateway for UnconfiguredGateway {
    async fn generate(
        &self,
        _request: &GenerationRequest,
        _options: &GenerationOptions,
    ) -> GenerationOutcome {
        GenerationOutcome::failed(AssistantErrorKind::ProviderError, self.reason.clone())
    }
}

/// Application entry point for every AI-backed operation.
pub struct WritingAssistantService {
    access: AssistantAccess,
    gateway: Arc<dyn AssistantGateway>,
    options: GenerationOptions,
    prompts: PromptRenderer,
}

impl WritingAssistantService {
    /// Builds the service from injected collaborators.
    ///
    /// The deployment mode is resolved from `config` once, here, and the
    /// durable quota is read once.
    pub async fn bootstrap(
        config: &AppConfig,
        settings_repository: Arc<dyn SettingsRepository>,
        quota_store: Arc<dyn QuotaStore>,
        gateway: Arc<dyn AssistantGateway>,
    ) -> Result<Self> {
        let mode = config.deployment.mode();
        let settings = Arc::new(SettingsService::new(settings_repository));
        let quota = QuotaTracker::load(quota_store).await;
        let access = AssistantAccess::new(
            mode,
            config.deployment.current_url.clone(),
            settings,
            quota,
        );

        // No model override: the gateway already resolved secret.json over [assistant].
        let mut options = GenerationOptions::default();
        if !config.assistant.system_instruction.trim().is_empty() {
            options = options.with_system_instruction(config.assistant.system_instruction.clone());
        }

        tracing::info!(
            "[WritingAssistant] Started in {} mode for {}",
            mode,
            config.deployment.current_url
        );

        Ok(Self {
            access,
            gateway,
            options,
            prompts: PromptRenderer::new()?,
        })
    }

    /// Builds the service on the file-backed stores under `paths` and the
    /// Gemini gateway configured in `secret.json`.
    pub async fn open(paths: &StorywellPaths, config: &AppConfig) -> Result<Self> {
        let settings_repository = Arc::new(TomlSettingsRepository::new(paths)?);
        let quota_store = Arc::new(LocalStorageQuotaStore::new(LocalStorage::new(paths)?));

        let secrets = SecretStorage::new(paths)?;
        let gateway: Arc<dyn AssistantGateway> =
            match GeminiAssistant::try_from_secrets(&secrets, &config.assistant) {
                Ok(gemini) => {
                    tracing::info!("[WritingAssistant] Using Gemini model {}", gemini.model());
                    Arc::new(gemini)
                }
                Err(e) => {
                    tracing::warn!("[WritingAssistant] Gemini is not configured: {}", e);
                    Arc::new(UnconfiguredGateway {
                        reason: format!("Gemini is not configured ({})", e),
                    })
                }
            };

        Self::bootstrap(config, settings_repository, quota_store, gateway).await
    }

    pub fn mode(&self) -> DeploymentMode {
        self.access.mode()
    }

    pub fn access(&self) -> &AssistantAccess {
        &self.access
    }

    /// Starts a fresh chat session sharing this service's gate and gateway.
    pub fn new_chat_session(&self) -> ChatSession {
        ChatSession::new(
            self.access.clone(),
            self.gateway.clone(),
            self.options.clone(),
        )
    }

    /// One gated generation for a free-form prompt.
    pub async fn ask(&self, prompt: &str) -> GenerationOutcome {
        self.generate(prompt.trim().to_string()).await
    }

    pub async fn suggest_story_idea(&self, theme: &str) -> Result<GenerationOutcome> {
        let prompt = self.prompts.story_idea(theme)?;
        Ok(self.generate(prompt).await)
    }

    pub async fn continue_story(&self, title: &str, content: &str) -> Result<GenerationOutcome> {
        let prompt = self.prompts.continue_story(title, content)?;
        Ok(self.generate(prompt).await)
    }

    pub async fn polish_story(&self, content: &str) -> Result<GenerationOutcome> {
        let prompt = self.prompts.polish_story(content)?;
        Ok(self.generate(prompt).await)
    }

    pub async fn status(&self) -> AssistantStatus {
        AssistantStatus {
            mode: self.access.mode(),
            current_url: self.access.current_url().to_string(),
            authorized_url: self.access.settings().authorized_url().await,
            authorized: self.access.is_authorized().await,
            quota: self.access.quota().await,
        }
    }

    pub async fn authorized_url(&self) -> String {
        self.access.settings().authorized_url().await
    }

    /// Persists a new authorized URL; later checks see it immediately.
    pub async fn update_authorized_url(&self, url: &str) -> Result<()> {
        self.access.settings().update_authorized_url(url).await
    }

    async fn generate(&self, prompt: String) -> GenerationOutcome {
        if prompt.trim().is_empty() {
            return GenerationOutcome::from_text(None);
        }
        self.access
            .run(
                self.gateway.as_ref(),
                &GenerationRequest::Prompt(prompt),
                &self.options,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MemorySettings {
        url: Mutex<String>,
    }

    #[async_trait]
    impl SettingsRepository for MemorySettings {
        async fn read_authorized_url(&self) -> Result<String> {
            Ok(self.url.lock().await.clone())
        }

        async fn write_authorized_url(&self, url: &str) -> Result<()> {
            *self.url.lock().await = url.to_string();
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryQuota {
        value: Mutex<Option<String>>,
    }

    #[async_trait]
    impl QuotaStore for MemoryQuota {
        async fn load_count(&self) -> Result<Option<String>> {
            Ok(self.value.lock().await.clone())
        }

        async fn save_count(&self, value: &str) -> Result<()> {
            *self.value.lock().await = Some(value.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingGateway {
        prompts: StdMutex<Vec<String>>,
        models: StdMutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl AssistantGateway for RecordingGateway {
        async fn generate(
            &self,
            request: &GenerationRequest,
            options: &GenerationOptions,
        ) -> GenerationOutcome {
            self.models.lock().unwrap().push(options.model.clone());
            if let GenerationRequest::Prompt(prompt) = request {
                self.prompts.lock().unwrap().push(prompt.clone());
            }
            GenerationOutcome::Text("Generated".to_string())
        }
    }

    fn restricted_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.deployment.host = "abc-123.scf.usercontent.goog".to_string();
        config.deployment.current_url = "https://abc-123.scf.usercontent.goog/".to_string();
        config
    }

    async fn build_service(
        config: &AppConfig,
        gateway: Arc<RecordingGateway>,
    ) -> (WritingAssistantService, Arc<MemoryQuota>) {
        let quota = Arc::new(MemoryQuota::default());
        let service = WritingAssistantService::bootstrap(
            config,
            Arc::new(MemorySettings::default()),
            quota.clone(),
            gateway,
        )
        .await
        .unwrap();
        (service, quota)
    }

    #[tokio::test]
    async fn test_restricted_service_denies_until_authorized() {
        let gateway = Arc::new(RecordingGateway::default());
        let (service, _) = build_service(&restricted_config(), gateway.clone()).await;
        assert_eq!(service.mode(), DeploymentMode::Restricted);

        let denied = service.suggest_story_idea("winter").await.unwrap();
        assert_eq!(
            denied.error_kind(),
            Some(AssistantErrorKind::AuthorizationDenied)
        );
        assert!(gateway.prompts.lock().unwrap().is_empty());

        service
            .update_authorized_url("https://abc-123.scf.usercontent.goog")
            .await
            .unwrap();
        let outcome = service.suggest_story_idea("winter").await.unwrap();
        assert!(outcome.is_success());
        assert!(gateway.prompts.lock().unwrap()[0].contains("winter"));
    }

    #[tokio::test]
    async fn test_writing_tasks_share_the_quota() {
        let gateway = Arc::new(RecordingGateway::default());
        let (service, store) = build_service(&restricted_config(), gateway).await;
        service
            .update_authorized_url("https://abc-123.scf.usercontent.goog")
            .await
            .unwrap();

        assert!(service.ask("hello").await.is_success());
        assert!(service.continue_story("T", "Once").await.unwrap().is_success());
        assert!(service.polish_story("teh cat").await.unwrap().is_success());

        let limited = service.ask("one more").await;
        assert_eq!(limited.error_kind(), Some(AssistantErrorKind::QuotaExceeded));
        assert_eq!(store.value.lock().await.as_deref(), Some("3"));

        let status = service.status().await;
        assert!(status.authorized);
        assert_eq!(status.quota.map(|q| q.remaining()), Some(0));
    }

    #[tokio::test]
    async fn test_owner_service_has_no_quota() {
        let gateway = Arc::new(RecordingGateway::default());
        let (service, store) = build_service(&AppConfig::default(), gateway).await;

        for _ in 0..5 {
            assert!(service.ask("hello").await.is_success());
        }
        assert_eq!(*store.value.lock().await, None);
        assert_eq!(service.status().await.quota, None);
    }

    #[tokio::test]
    async fn test_blank_prompt_never_reaches_the_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let (service, _) = build_service(&AppConfig::default(), gateway.clone()).await;

        let outcome = service.ask("   ").await;
        assert_eq!(outcome.error_kind(), Some(AssistantErrorKind::EmptyResponse));
        assert!(gateway.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_requests_leave_model_choice_to_the_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let mut config = AppConfig::default();
        config.assistant.model = "gemini-from-config".to_string();
        let (service, _) = build_service(&config, gateway.clone()).await;

        service.ask("Write a haiku").await;
        service.suggest_story_idea("lighthouses").await.unwrap();

        assert_eq!(*gateway.models.lock().unwrap(), vec![None, None]);
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_reports_provider_error() {
        let gateway = UnconfiguredGateway {
            reason: "Gemini is not configured".to_string(),
        };
        let outcome = gateway
            .generate(
                &GenerationRequest::Prompt("hi".to_string()),
                &GenerationOptions::default(),
            )
            .await;
        assert!(outcome.display_text().contains("not configured"));
    }
}
