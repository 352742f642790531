//! Assistant gateway trait.

use super::message::ChatMessage;
use super::outcome::GenerationOutcome;
use async_trait::async_trait;

/// What to send to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    /// A single self-contained prompt.
    Prompt(String),
    /// A conversation transcript, oldest first; the last entry is the user turn.
    Conversation(Vec<ChatMessage>),
}

/// Per-call options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    pub system_instruction: Option<String>,
    /// Overrides the gateway's default model.
    pub model: Option<String>,
}

impl GenerationOptions {
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// A single, non-retried call to a generative text provider.
///
/// Implementations never retry and never touch quota or session state;
/// accounting is the caller's job. Failures are reported through
/// [`GenerationOutcome::Failed`], never as a Rust error.
///
/// Callers must pass [`super::AssistantAccess::admit`] first.
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> GenerationOutcome;
}
