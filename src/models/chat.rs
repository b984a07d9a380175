//! Inbound chat API models
//!
//! Request and response bodies for the `/chat` and `/chat-sync` endpoints

use serde::{Deserialize, Serialize};

/// Inbound chat request
///
/// One request maps to one outbound provider call; nothing persists
/// across requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier used for provider selection (e.g. "chatgpt")
    #[serde(default)]
    pub model: String,
    /// The user prompt, forwarded as the sole user message
    #[serde(default)]
    pub prompt: String,
    /// Sampling temperature (provider-specific valid range)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Response length cap; adapters apply their own default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Response body of the full-completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The complete generated answer
    pub text: String,
}

/// Validate an inbound chat request
///
/// Model and prompt must be non-empty; temperature, if present, must be
/// a finite number. Range checks are the provider's concern.
pub fn validate_chat_request(request: &ChatRequest) -> Result<(), String> {
    if request.model.trim().is_empty() {
        return Err("Model identifier cannot be empty".to_string());
    }

    if request.prompt.is_empty() {
        return Err("Prompt cannot be empty".to_string());
    }

    if let Some(temp) = request.temperature {
        if !temp.is_finite() {
            return Err("temperature must be a finite number".to_string());
        }
    }

    if let Some(max_tokens) = request.max_tokens {
        if max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ChatRequest {
        ChatRequest {
            model: "chatgpt".to_string(),
            prompt: "Hello".to_string(),
            temperature: Some(0.7),
            max_tokens: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(validate_chat_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut request = valid_request();
        request.model = String::new();
        assert!(validate_chat_request(&request).is_err());

        request.model = "   ".to_string();
        assert!(validate_chat_request(&request).is_err());
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let mut request = valid_request();
        request.prompt = String::new();
        assert!(validate_chat_request(&request).is_err());
    }

    #[test]
    fn test_non_finite_temperature_rejected() {
        let mut request = valid_request();
        request.temperature = Some(f32::NAN);
        assert!(validate_chat_request(&request).is_err());

        request.temperature = Some(f32::INFINITY);
        assert!(validate_chat_request(&request).is_err());
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let mut request = valid_request();
        request.max_tokens = Some(0);
        assert!(validate_chat_request(&request).is_err());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(request.model.is_empty());
        assert!(request.prompt.is_empty());
        assert!(validate_chat_request(&request).is_err());
    }
}
