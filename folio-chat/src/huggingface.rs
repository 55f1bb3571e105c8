//! Hugging Face chat-completions text generator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ChatError, Result};
use crate::generator::TextGenerator;

/// Default instruction-tuned chat model.
pub const DEFAULT_CHAT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";

/// Default output-token budget per answer.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

const HF_CHAT_COMPLETIONS_URL: &str = "https://router.huggingface.co/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ── request/response types ──

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

// ── generator ──

/// Single-shot, non-streaming completions against an OpenAI-compatible
/// endpoint. Decoding is deterministic (temperature 0) on a best-effort
/// basis; the remote model is not under this crate's control.
pub struct HfTextGenerator {
    client: Client,
    token: String,
    model: String,
    max_tokens: u32,
    endpoint: String,
}

impl HfTextGenerator {
    /// Create a generator using [`DEFAULT_CHAT_MODEL`].
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ConfigError`] if `token` is empty.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_model(token, DEFAULT_CHAT_MODEL)
    }

    /// Create a generator for a specific model.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ConfigError`] if `token` is empty.
    pub fn with_model(token: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(ChatError::ConfigError("HF token must not be empty".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            token,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            endpoint: HF_CHAT_COMPLETIONS_URL.to_string(),
        })
    }

    /// Create a generator from the `HF_TOKEN` environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("HF_TOKEN")
            .map_err(|_| ChatError::ConfigError("HF_TOKEN not set".to_string()))?;
        Self::new(token)
    }

    /// Override the output-token budget.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Override the chat-completions endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TextGenerator for HfTextGenerator {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        debug!(model = %self.model, max_tokens = self.max_tokens, "requesting completion");
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: 0.0,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::GenerationError {
                provider: "huggingface".to_string(),
                message: format!("request failed: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "completion request rejected");
            return Err(ChatError::GenerationError {
                provider: "huggingface".to_string(),
                message: format!("status {status}: {body}"),
            });
        }

        let parsed: ChatResponse =
            response.json().await.map_err(|e| ChatError::GenerationError {
                provider: "huggingface".to_string(),
                message: format!("invalid response body: {e}"),
            })?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ChatError::GenerationError {
                provider: "huggingface".to_string(),
                message: "response contained no choices".to_string(),
            }
        })?;
        Ok(choice.message.content)
    }
}
