//! OpenAI-compatible provider adapter
//!
//! Delta-streaming provider: streams answers as SSE-framed chat
//! completion chunks and supports single-shot completions.

use super::{FragmentStream, Provider};
use crate::config::UpstreamConfig;
use crate::models::chat::ChatRequest;
use crate::models::upstream::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, DEFAULT_MAX_TOKENS,
};
use crate::relay::spawn_fragment_relay;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Placeholder used when an error response body cannot be read
const UNREADABLE_BODY: &str = "<unreadable response body>";

/// OpenAI-compatible provider
pub struct OpenAiProvider {
    client: Client,
    stream_client: Client,
    config: UpstreamConfig,
}

impl OpenAiProvider {
    /// Create a new provider from upstream configuration
    pub fn new(config: UpstreamConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("chatrelay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let stream_client = Client::builder()
            .timeout(Duration::from_secs(config.stream_timeout))
            .user_agent(concat!("chatrelay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            stream_client,
            config,
        })
    }

    /// Build the request URL
    fn build_url(&self) -> String {
        let base_url = self.config.base_url.trim_end_matches('/');
        format!("{}/chat/completions", base_url)
    }

    /// Check the credential before any network call
    fn require_api_key(&self) -> AppResult<&str> {
        if self.config.api_key.is_empty() {
            return Err(AppError::Configuration(
                "OpenAI API key is not configured".to_string(),
            ));
        }
        Ok(&self.config.api_key)
    }

    /// Build the outbound request body with the prompt as the sole
    /// user message
    fn build_request(&self, request: &ChatRequest, stream: bool) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(request.prompt.clone())],
            max_tokens: Some(request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)),
            temperature: request.temperature,
            stream: stream.then_some(true),
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<String> {
        let api_key = self.require_api_key()?;
        debug!("Sending chat completion request to {}", self.build_url());

        let response = self
            .client
            .post(self.build_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(request, false))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| UNREADABLE_BODY.to_string());
            return Err(AppError::Provider {
                status: status.as_u16(),
                message: body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        debug!("Chat completion request finished");

        // Absence of text is a valid degenerate answer
        Ok(completion.answer_text())
    }

    async fn stream_complete(&self, request: &ChatRequest) -> AppResult<FragmentStream> {
        let api_key = self.require_api_key()?;
        debug!(
            "Sending streaming chat completion request to {}",
            self.build_url()
        );

        let response = self
            .stream_client
            .post(self.build_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&self.build_request(request, true))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| UNREADABLE_BODY.to_string());
            return Err(AppError::Provider {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(Box::pin(spawn_fragment_relay(response.bytes_stream())))
    }
}
