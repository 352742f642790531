use crate::assistant::{
    Admission, AssistantAccess, AssistantGateway, ChatMessage, GenerationOptions,
    GenerationOutcome, GenerationRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Whether a turn is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PendingState {
    #[default]
    Idle,
    Sending,
}

/// Why a submission was dropped without touching the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// The text was empty or whitespace.
    Blank,
    /// Another turn is still in flight.
    Busy,
    /// The session has been closed.
    Closed,
}

/// What became of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    Ignored(IgnoredReason),
    /// The turn completed and this assistant message was appended.
    Replied(ChatMessage),
    /// The session was closed while the turn was in flight; the reply was dropped.
    Discarded,
}

#[derive(Debug, Default)]
struct SessionState {
    messages: Vec<ChatMessage>,
    pending: PendingState,
    closed: bool,
}

/// One assistant conversation.
///
/// The transcript is append-only and ordered by causality: the user message
/// is appended before any gate check or network call, and exactly one
/// assistant message follows it. At most one turn is in flight; further
/// submissions are ignored, not queued.
///
/// The session is meant to be shared (`Arc<ChatSession>`) between the task
/// that drives a turn and the front-end that displays it. The internal lock
/// is released for the duration of the provider call.
pub struct ChatSession {
    id: String,
    access: AssistantAccess,
    gateway: Arc<dyn AssistantGateway>,
    options: GenerationOptions,
    state: Mutex<SessionState>,
}

impl ChatSession {
    pub fn new(
        access: AssistantAccess,
        gateway: Arc<dyn AssistantGateway>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            access,
            gateway,
            options,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn access(&self) -> &AssistantAccess {
        &self.access
    }

    /// A copy of the transcript, oldest first.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().await.messages.clone()
    }

    pub async fn pending_state(&self) -> PendingState {
        self.state.lock().await.pending
    }

    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    /// Discards the session. A turn still in flight will have its reply dropped.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if !state.closed {
            state.closed = true;
            tracing::debug!(session_id = %self.id, "[Chat] Session closed");
        }
    }

    /// Processes one user turn.
    pub async fn submit(&self, user_text: &str) -> SubmitResult {
        let history = {
            let mut state = self.state.lock().await;
            if state.closed {
                return SubmitResult::Ignored(IgnoredReason::Closed);
            }
            if state.pending == PendingState::Sending {
                tracing::debug!(session_id = %self.id, "[Chat] Turn ignored: already sending");
                return SubmitResult::Ignored(IgnoredReason::Busy);
            }
            if user_text.trim().is_empty() {
                return SubmitResult::Ignored(IgnoredReason::Blank);
            }

            state.messages.push(ChatMessage::user(user_text));
            state.pending = PendingState::Sending;
            state.messages.clone()
        };

        let outcome = match self.access.admit().await {
            Admission::Denied(kind) => GenerationOutcome::failed(kind, kind.to_string()),
            Admission::Granted => {
                tracing::debug!(
                    session_id = %self.id,
                    turns = history.len(),
                    "[Chat] Sending turn to assistant"
                );
                self.gateway
                    .generate(&GenerationRequest::Conversation(history), &self.options)
                    .await
            }
        };

        let mut state = self.state.lock().await;
        state.pending = PendingState::Idle;

        if state.closed {
            tracing::debug!(session_id = %self.id, "[Chat] Late reply dropped for closed session");
            return SubmitResult::Discarded;
        }

        match outcome.error_kind() {
            Some(kind) if kind.is_gate_denial() => {
                tracing::info!(session_id = %self.id, error_kind = %kind, "[Chat] Turn refused");
            }
            Some(kind) if kind.is_provider_failure() => {
                tracing::warn!(session_id = %self.id, error_kind = %kind, "[Chat] Assistant call failed");
            }
            Some(kind) => {
                tracing::info!(session_id = %self.id, error_kind = %kind, "[Chat] Turn failed");
            }
            None => {}
        }

        let success = outcome.is_success();
        let message = outcome.clone().into_message();
        state.messages.push(message.clone());
        if success {
            self.access.settle(&outcome).await;
        }

        SubmitResult::Replied(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{AssistantErrorKind, MessageRole};
    use crate::authorization::DeploymentMode;
    use crate::test_support::{ScriptedGateway, build_access};
    use tokio::sync::Notify;

    fn session(access: AssistantAccess, gateway: Arc<ScriptedGateway>) -> Arc<ChatSession> {
        Arc::new(ChatSession::new(access, gateway, GenerationOptions::default()))
    }

    #[tokio::test]
    async fn test_blank_submit_is_ignored() {
        let (access, _) = build_access(DeploymentMode::Owner, "", "http://localhost", 0).await;
        let gateway = Arc::new(ScriptedGateway::replying("hi"));
        let session = session(access, gateway.clone());

        assert_eq!(
            session.submit("   \n\t").await,
            SubmitResult::Ignored(IgnoredReason::Blank)
        );
        assert!(session.messages().await.is_empty());
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_turn_in_restricted_mode_consumes_quota() {
        let (access, quota) = build_access(
            DeploymentMode::Restricted,
            "https://app.example.com",
            "https://app.example.com/write",
            1,
        )
        .await;
        let gateway = Arc::new(ScriptedGateway::replying("A dragon wakes."));
        let session = session(access, gateway.clone());

        let result = session.submit("Give me an opening line").await;

        let messages = session.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), MessageRole::User);
        assert_eq!(messages[0].text(), "Give me an opening line");
        assert_eq!(messages[1].role(), MessageRole::Assistant);
        assert_eq!(messages[1].text(), "A dragon wakes.");
        assert_eq!(result, SubmitResult::Replied(messages[1].clone()));
        assert_eq!(quota.snapshot().await.count, 2);
        assert_eq!(session.pending_state().await, PendingState::Idle);
    }

    #[tokio::test]
    async fn test_unauthorized_origin_never_reaches_gateway() {
        let (access, quota) = build_access(
            DeploymentMode::Restricted,
            "https://app.example.com",
            "https://elsewhere.test/",
            0,
        )
        .await;
        let gateway = Arc::new(ScriptedGateway::replying("should not be seen"));
        let session = session(access, gateway.clone());

        session.submit("hello").await;

        let messages = session.messages().await;
        assert_eq!(messages.len(), 2);
        assert!(messages[1].text().contains("not authorized"));
        assert_eq!(gateway.calls(), 0);
        assert_eq!(quota.snapshot().await.count, 0);
    }

    #[tokio::test]
    async fn test_empty_authorized_url_denies_restricted_mode() {
        let (access, _) =
            build_access(DeploymentMode::Restricted, "", "https://app.example.com", 0).await;
        let gateway = Arc::new(ScriptedGateway::replying("nope"));
        let session = session(access, gateway.clone());

        session.submit("hello").await;
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_quota_appends_limit_message() {
        let (access, quota) = build_access(
            DeploymentMode::Restricted,
            "https://app.example.com",
            "https://app.example.com",
            3,
        )
        .await;
        let gateway = Arc::new(ScriptedGateway::replying("unused"));
        let session = session(access, gateway.clone());

        session.submit("hello").await;

        let messages = session.messages().await;
        assert_eq!(messages[0].text(), "hello");
        assert!(messages[1].text().to_lowercase().contains("limit reached"));
        assert_eq!(gateway.calls(), 0);
        assert_eq!(quota.snapshot().await.count, 3);
    }

    #[tokio::test]
    async fn test_owner_mode_ignores_quota() {
        let (access, quota) =
            build_access(DeploymentMode::Owner, "", "http://localhost:3000", 99).await;
        let gateway = Arc::new(ScriptedGateway::replying("Sure."));
        let session = session(access, gateway.clone());

        session.submit("one").await;
        session.submit("two").await;

        assert_eq!(gateway.calls(), 2);
        assert_eq!(quota.snapshot().await.count, 99);
    }

    #[tokio::test]
    async fn test_provider_error_keeps_count_and_returns_to_idle() {
        let (access, quota) = build_access(
            DeploymentMode::Restricted,
            "https://app.example.com",
            "https://app.example.com",
            0,
        )
        .await;
        let gateway = Arc::new(ScriptedGateway::new(vec![GenerationOutcome::failed(
            AssistantErrorKind::ProviderError,
            "timeout",
        )]));
        let session = session(access, gateway.clone());

        session.submit("hello").await;

        let messages = session.messages().await;
        assert!(messages[1].text().contains("timeout"));
        assert_eq!(quota.snapshot().await.count, 0);
        assert_eq!(session.pending_state().await, PendingState::Idle);
    }

    #[tokio::test]
    async fn test_conversation_history_is_sent_in_order() {
        let (access, _) = build_access(DeploymentMode::Owner, "", "http://localhost", 0).await;
        let gateway = Arc::new(ScriptedGateway::new(vec![
            GenerationOutcome::Text("first reply".to_string()),
            GenerationOutcome::Text("second reply".to_string()),
        ]));
        let session = session(access, gateway.clone());

        session.submit("first").await;
        session.submit("second").await;

        let last = gateway.last_request().unwrap();
        let GenerationRequest::Conversation(history) = last else {
            panic!("expected a conversation request");
        };
        let texts: Vec<&str> = history.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["first", "first reply", "second"]);
    }

    #[tokio::test]
    async fn test_submit_while_sending_is_ignored() {
        let (access, _) = build_access(DeploymentMode::Owner, "", "http://localhost", 0).await;
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(ScriptedGateway::replying("done").held_until(release.clone()));
        let session = session(access, gateway.clone());

        let driver = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("first").await })
        };
        while session.pending_state().await != PendingState::Sending {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            session.submit("second").await,
            SubmitResult::Ignored(IgnoredReason::Busy)
        );

        release.notify_one();
        let result = driver.await.unwrap();
        assert!(matches!(result, SubmitResult::Replied(_)));

        let texts: Vec<String> = session
            .messages()
            .await
            .iter()
            .map(|m| m.text().to_string())
            .collect();
        assert_eq!(texts, vec!["first", "done"]);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_late_reply_after_close_is_discarded() {
        let (access, quota) = build_access(
            DeploymentMode::Restricted,
            "https://app.example.com",
            "https://app.example.com",
            0,
        )
        .await;
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(ScriptedGateway::replying("too late").held_until(release.clone()));
        let session = session(access, gateway);

        let driver = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("hello").await })
        };
        while session.pending_state().await != PendingState::Sending {
            tokio::task::yield_now().await;
        }

        session.close().await;
        release.notify_one();

        assert_eq!(driver.await.unwrap(), SubmitResult::Discarded);
        assert_eq!(session.messages().await.len(), 1);
        assert_eq!(quota.snapshot().await.count, 0);
        assert_eq!(
            session.submit("again").await,
            SubmitResult::Ignored(IgnoredReason::Closed)
        );
    }
}
