//! GeminiAssistant - Direct REST API gateway for Gemini.
//!
//! Calls the Gemini `generateContent` endpoint with a plain prompt or a
//! whole conversation. Every failure is folded into a
//! [`GenerationOutcome::Failed`]; nothing is retried.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storywell_core::assistant::{
    AssistantErrorKind, AssistantGateway, ChatMessage, GenerationOptions, GenerationOutcome,
    GenerationRequest, MessageRole,
};
use storywell_core::config::{AssistantConfig, DEFAULT_GEMINI_MODEL};
use storywell_core::error::{Result, StorywellError};
use storywell_infrastructure::SecretStorage;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gateway implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiAssistant {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiAssistant {
    /// Creates a gateway with the provided API key, the default model and no timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Builds a gateway from `secret.json` plus the `[assistant]` config section.
    ///
    /// A model name in `secret.json` wins over the config file.
    pub fn try_from_secrets(secrets: &SecretStorage, config: &AssistantConfig) -> Result<Self> {
        let gemini = secrets.load_gemini()?;
        let model = gemini
            .model_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| config.model.clone());

        Self::new(gemini.api_key)
            .with_model(model)
            .with_timeout(config.request_timeout())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Rebuilds the HTTP client with the given per-request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        self.client = builder.build().map_err(|e| {
            StorywellError::config(format!("Failed to build Gemini HTTP client: {}", e))
        })?;
        Ok(self)
    }

    /// Points the gateway at a different API root, e.g. a local proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, model: &str, body: &GenerateContentRequest) -> GenerationOutcome {
        let url = format!("{}/{model}:generateContent", self.base_url);

        tracing::debug!(
            "[GeminiAssistant] Sending {} content block(s) to {}",
            body.contents.len(),
            model
        );

        let response = match self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return map_transport_error(err),
        };

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return map_http_error(status, &body_text);
        }

        match response.json::<GenerateContentResponse>().await {
            Ok(parsed) => GenerationOutcome::from_text(extract_text_response(parsed)),
            Err(err) if err.is_timeout() => map_transport_error(err),
            Err(err) => GenerationOutcome::failed(
                AssistantErrorKind::ProviderError,
                format!("Failed to parse Gemini response: {}", err.without_url()),
            ),
        }
    }
}

#[async_trait]
impl AssistantGateway for GeminiAssistant {
    async fn generate(
        &self,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> GenerationOutcome {
        let body = build_request(request, options);
        if body.contents.is_empty() {
            return GenerationOutcome::failed(
                AssistantErrorKind::ProviderError,
                "nothing to send to Gemini",
            );
        }

        let model = options.model.as_deref().unwrap_or(&self.model);
        let outcome = self.send_request(model, &body).await;
        if let GenerationOutcome::Failed { kind, detail } = &outcome {
            tracing::warn!("[GeminiAssistant] Request failed ({}): {}", kind, detail);
        }
        outcome
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn role_name(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    }
}

fn to_content(message: &ChatMessage) -> Content {
    Content {
        role: role_name(message.role()),
        parts: vec![Part {
            text: message.text().to_string(),
        }],
    }
}

fn build_request(request: &GenerationRequest, options: &GenerationOptions) -> GenerateContentRequest {
    let contents = match request {
        GenerationRequest::Prompt(prompt) => vec![Content {
            role: "user",
            parts: vec![Part {
                text: prompt.clone(),
            }],
        }],
        GenerationRequest::Conversation(messages) => messages
            .iter()
            .filter(|message| !message.text().trim().is_empty())
            .map(to_content)
            .collect(),
    };

    let system_instruction = options
        .system_instruction
        .as_ref()
        .filter(|text| !text.trim().is_empty())
        .map(|text| SystemInstruction {
            parts: vec![Part { text: text.clone() }],
        });

    GenerateContentRequest {
        contents,
        system_instruction,
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text_response(response: GenerateContentResponse) -> Option<String> {
    let content = response
        .candidates?
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)?;

    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    Some(text)
}

/// The request URL is stripped so nothing endpoint-specific ends up in the
/// user-visible detail or the logs.
fn map_transport_error(err: reqwest::Error) -> GenerationOutcome {
    let err = err.without_url();
    if err.is_timeout() {
        GenerationOutcome::failed(
            AssistantErrorKind::Timeout,
            format!("Gemini API request timeout: {err}"),
        )
    } else {
        GenerationOutcome::failed(
            AssistantErrorKind::ProviderError,
            format!("Gemini API request failed: {err}"),
        )
    }
}

fn map_http_error(status: StatusCode, body: &str) -> GenerationOutcome {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    let kind = if status == StatusCode::GATEWAY_TIMEOUT || status == StatusCode::REQUEST_TIMEOUT {
        AssistantErrorKind::Timeout
    } else {
        AssistantErrorKind::ProviderError
    };

    GenerationOutcome::failed(kind, format!("HTTP {}: {}", status.as_u16(), message))
}
