//! Outcome of a single assistant call.

use super::message::ChatMessage;
use crate::quota::QUOTA_LIMIT;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Why an AI call produced no usable text.
///
/// Every kind ends up as an assistant-role message; none of them escape a
/// turn as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AssistantErrorKind {
    /// The running origin is not permitted to use AI features.
    AuthorizationDenied,
    /// The restricted-mode usage cap has been reached.
    QuotaExceeded,
    /// The provider answered but returned no text.
    EmptyResponse,
    /// Network, credential, or provider-side failure.
    ProviderError,
    /// The provider did not answer within the request timeout.
    /// Handled exactly like `ProviderError`.
    Timeout,
}

impl AssistantErrorKind {
    /// Whether the failure came from the provider call itself.
    pub fn is_provider_failure(self) -> bool {
        matches!(self, Self::ProviderError | Self::Timeout)
    }

    /// Whether the call was refused before reaching the provider.
    pub fn is_gate_denial(self) -> bool {
        matches!(self, Self::AuthorizationDenied | Self::QuotaExceeded)
    }
}

/// Result of one provider call, or of a refused call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationOutcome {
    Text(String),
    Failed {
        kind: AssistantErrorKind,
        detail: String,
    },
}

impl GenerationOutcome {
    pub fn failed(kind: AssistantErrorKind, detail: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            detail: detail.into(),
        }
    }

    /// Builds an outcome from provider text, treating blank text as `EmptyResponse`.
    pub fn from_text(text: Option<String>) -> Self {
        match text {
            Some(text) if !text.trim().is_empty() => Self::Text(text),
            _ => Self::failed(
                AssistantErrorKind::EmptyResponse,
                "the provider returned no text",
            ),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn error_kind(&self) -> Option<AssistantErrorKind> {
        match self {
            Self::Text(_) => None,
            Self::Failed { kind, .. } => Some(*kind),
        }
    }

    /// The text shown to the user for this outcome.
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Failed { kind, detail } => match kind {
                AssistantErrorKind::AuthorizationDenied => {
                    "AI features are not authorized for this origin. \
                     Ask the site owner to add it as the authorized URL in settings."
                        .to_string()
                }
                AssistantErrorKind::QuotaExceeded => format!(
                    "Usage limit reached: this shared app allows {QUOTA_LIMIT} AI requests per browser."
                ),
                AssistantErrorKind::EmptyResponse => {
                    "The assistant returned an empty response. Please try again.".to_string()
                }
                AssistantErrorKind::ProviderError => {
                    format!("The assistant could not respond: {detail}")
                }
                AssistantErrorKind::Timeout => {
                    format!("The assistant did not respond in time: {detail}")
                }
            },
        }
    }

    /// Folds the outcome into an assistant-role message.
    pub fn into_message(self) -> ChatMessage {
        ChatMessage::assistant(self.display_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_blank_is_empty_response() {
        assert_eq!(
            GenerationOutcome::from_text(Some("  \n".to_string())).error_kind(),
            Some(AssistantErrorKind::EmptyResponse)
        );
        assert_eq!(
            GenerationOutcome::from_text(None).error_kind(),
            Some(AssistantErrorKind::EmptyResponse)
        );
        assert!(GenerationOutcome::from_text(Some("Once upon".to_string())).is_success());
    }

    #[test]
    fn test_provider_error_message_embeds_detail() {
        let message =
            GenerationOutcome::failed(AssistantErrorKind::ProviderError, "timeout").into_message();
        assert!(!message.is_user());
        assert!(message.text().contains("timeout"));
    }

    #[test]
    fn test_quota_message_mentions_limit() {
        let text = GenerationOutcome::failed(AssistantErrorKind::QuotaExceeded, "").display_text();
        assert!(text.to_lowercase().contains("limit reached"));
    }

    #[test]
    fn test_kind_classification() {
        assert!(AssistantErrorKind::Timeout.is_provider_failure());
        assert!(!AssistantErrorKind::EmptyResponse.is_provider_failure());
        assert!(AssistantErrorKind::QuotaExceeded.is_gate_denial());
        assert_eq!(AssistantErrorKind::AuthorizationDenied.to_string(), "authorization_denied");
    }
}
