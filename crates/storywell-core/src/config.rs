//! Configuration models.
//!
//! `AppConfig` mirrors `config.toml`; `SecretConfig` mirrors `secret.json`.
//! Every field has a default so a missing or partial file still loads.

use crate::authorization::{DEFAULT_SHARED_HOST_MARKER, DeploymentMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a friendly creative-writing assistant for a \
short story community. Help users brainstorm, draft, and polish short stories. Keep answers \
concise and encouraging.";

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub deployment: DeploymentConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// Where the app is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Host the app is served from. Used only to derive the deployment mode.
    #[serde(default = "default_host")]
    pub host: String,
    /// Full URL of the running page, matched against the authorized URL.
    #[serde(default = "default_current_url")]
    pub current_url: String,
    /// Host fragment identifying a shared/preview deployment.
    #[serde(default = "default_shared_host_marker")]
    pub shared_host_marker: String,
}

impl DeploymentConfig {
    pub fn mode(&self) -> DeploymentMode {
        DeploymentMode::from_host(&self.host, &self.shared_host_marker)
    }
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            current_url: default_current_url(),
            shared_host_marker: default_shared_host_marker(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Provider request timeout; `0` disables the bound.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
}

impl AssistantConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            system_instruction: default_system_instruction(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_current_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_shared_host_marker() -> String {
    DEFAULT_SHARED_HOST_MARKER.to_string()
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_system_instruction() -> String {
    DEFAULT_SYSTEM_INSTRUCTION.to_string()
}

/// Root configuration structure for secret.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [deployment]
            host = "abc.scf.usercontent.goog"
            "#,
        )
        .unwrap();

        assert_eq!(config.deployment.mode(), DeploymentMode::Restricted);
        assert_eq!(config.deployment.current_url, "http://localhost:3000");
        assert_eq!(config.assistant.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.assistant.request_timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let config: AppConfig = toml::from_str(
            r#"
            [assistant]
            request_timeout_secs = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.assistant.request_timeout(), None);
        assert_eq!(config.deployment.mode(), DeploymentMode::Owner);
    }
}
