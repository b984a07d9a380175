//! Gemini provider adapter
//!
//! Full-response provider: the upstream answers with a single JSON
//! body, so the streaming capability emits the completed answer as one
//! fragment.

use super::{FragmentStream, Provider};
use crate::config::UpstreamConfig;
use crate::models::chat::ChatRequest;
use crate::models::upstream::{
    GeminiContent, GeminiPart, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    DEFAULT_MAX_TOKENS,
};
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Placeholder used when an error response body cannot be read
const UNREADABLE_BODY: &str = "<unreadable response body>";

/// Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: UpstreamConfig,
}

impl GeminiProvider {
    /// Create a new provider from upstream configuration
    pub fn new(config: UpstreamConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("chatrelay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Build the generateContent URL including the API key parameter
    fn build_url(&self, api_key: &str) -> String {
        let base_url = self.config.base_url.trim_end_matches('/');
        format!(
            "{}/models/{}:generateContent?key={}",
            base_url, self.config.model, api_key
        )
    }

    /// Check the credential before any network call
    fn require_api_key(&self) -> AppResult<&str> {
        if self.config.api_key.is_empty() {
            return Err(AppError::Configuration(
                "Gemini API key is not configured".to_string(),
            ));
        }
        Ok(&self.config.api_key)
    }

    /// Build the outbound request body
    fn build_request(&self, request: &ChatRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: Some(request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)),
            }),
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<String> {
        let api_key = self.require_api_key()?;
        debug!("Sending Gemini generateContent request");

        let response = self
            .client
            .post(self.build_url(api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(request))
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

        let generated: GenerateContentResponse = response.json().await?;
        debug!("Gemini request finished");

        // Missing candidates or parts are a valid degenerate answer
        Ok(generated.answer_text())
    }

    async fn stream_complete(&self, request: &ChatRequest) -> AppResult<FragmentStream> {
        // The upstream has no incremental mode here; relay the completed
        // answer as a single fragment
        let text = self.complete(request).await?;
        Ok(Box::pin(tokio_stream::once(Ok(text))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(api_key: &str) -> UpstreamConfig {
        UpstreamConfig {
            api_key: api_key.to_string(),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: 30,
            stream_timeout: 300,
        }
    }

    #[test]
    fn test_provider_name() {
        let provider = GeminiProvider::new(create_test_config("key")).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_build_url() {
        let provider = GeminiProvider::new(create_test_config("secret")).unwrap();
        assert_eq!(
            provider.build_url("secret"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn test_build_request() {
        let provider = GeminiProvider::new(create_test_config("key")).unwrap();
        let chat = ChatRequest {
            model: "gemini".to_string(),
            prompt: "Hello".to_string(),
            temperature: Some(0.3),
            max_tokens: Some(64),
        };

        let request = provider.build_request(&chat);
        assert_eq!(request.contents.len(), 1);
        assert_eq!(
            request.contents[0].parts[0].text.as_deref(),
            Some("Hello")
        );

        let config = request.generation_config.unwrap();
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.max_output_tokens, Some(64));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network_call() {
        let provider = GeminiProvider::new(create_test_config("")).unwrap();
        let chat = ChatRequest {
            model: "gemini".to_string(),
            prompt: "Hi".to_string(),
            temperature: None,
            max_tokens: None,
        };

        let result = provider.complete(&chat).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
