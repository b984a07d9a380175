//! Simulated provider adapter
//!
//! Deterministic local fallback used for model identifiers that have
//! no live adapter: answers with the reversed prompt, truncated to a
//! fixed maximum length. Keeps demo requests working without any
//! upstream credentials.

use super::{FragmentStream, Provider};
use crate::models::chat::ChatRequest;
use crate::utils::error::AppResult;
use async_trait::async_trait;

/// Maximum length of a simulated reply in characters
const SIMULATED_REPLY_MAX_CHARS: usize = 200;

/// Simulated provider
#[derive(Debug, Default)]
pub struct SimulatedProvider;

impl SimulatedProvider {
    pub fn new() -> Self {
        Self
    }

    /// Build the deterministic reply for a prompt
    fn simulate_reply(prompt: &str) -> String {
        prompt
            .chars()
            .rev()
            .take(SIMULATED_REPLY_MAX_CHARS)
            .collect()
    }
}

#[async_trait]
impl Provider for SimulatedProvider {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<String> {
        Ok(Self::simulate_reply(&request.prompt))
    }

    async fn stream_complete(&self, request: &ChatRequest) -> AppResult<FragmentStream> {
        let reply = Self::simulate_reply(&request.prompt);
        Ok(Box::pin(tokio_stream::once(Ok(reply))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    fn request_with_prompt(prompt: &str) -> ChatRequest {
        ChatRequest {
            model: "unknown-model".to_string(),
            prompt: prompt.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }

    #[tokio::test]
    async fn test_reply_is_reversed_prompt() {
        let provider = SimulatedProvider::new();
        let reply = provider.complete(&request_with_prompt("Hello")).await.unwrap();
        assert_eq!(reply, "olleH");
    }

    #[tokio::test]
    async fn test_reply_is_deterministic_and_non_empty() {
        let provider = SimulatedProvider::new();
        let request = request_with_prompt("same input");

        let first = provider.complete(&request).await.unwrap();
        let second = provider.complete(&request).await.unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[tokio::test]
    async fn test_reply_is_truncated() {
        let provider = SimulatedProvider::new();
        let long_prompt = "x".repeat(500);
        let reply = provider.complete(&request_with_prompt(&long_prompt)).await.unwrap();
        assert_eq!(reply.chars().count(), SIMULATED_REPLY_MAX_CHARS);
    }

    #[tokio::test]
    async fn test_reversal_is_character_based() {
        let provider = SimulatedProvider::new();
        let reply = provider.complete(&request_with_prompt("héllo🦀")).await.unwrap();
        assert_eq!(reply, "🦀olléh");
    }

    #[tokio::test]
    async fn test_stream_concatenation_matches_complete() {
        let provider = SimulatedProvider::new();
        let request = request_with_prompt("streaming parity check");

        let full = provider.complete(&request).await.unwrap();

        let mut stream = provider.stream_complete(&request).await.unwrap();
        let mut streamed = String::new();
        while let Some(fragment) = stream.next().await {
            streamed.push_str(&fragment.unwrap());
        }

        assert_eq!(streamed, full);
    }
}
