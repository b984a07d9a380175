//! Upstream provider wire shapes
//!
//! Serde models for the OpenAI-compatible chat completion API and the
//! Gemini generateContent API. Response models are deliberately loose:
//! only the fields the relay actually reads are declared, everything
//! else is ignored.

use serde::{Deserialize, Serialize};

/// Default response-length cap applied when the caller does not set one
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

// ---------------------------------------------------------------------------
// OpenAI-compatible chat completion API
// ---------------------------------------------------------------------------

/// Chat completion request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Option<String>,
}

impl ChatMessage {
    /// Build a user message from a prompt
    pub fn user(prompt: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(prompt.into()),
        }
    }
}

/// Chat completion response (non-streaming)
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    pub message: Option<ChatMessage>,
}

impl ChatCompletionResponse {
    /// Extract the answer text from the known response shape
    ///
    /// A missing message or content field is a valid degenerate answer,
    /// not an error.
    pub fn answer_text(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.clone())
            .unwrap_or_default()
    }
}

/// One streamed chat completion chunk
///
/// Delta-style payloads carry `choices[0].delta.content`; some providers
/// send full-message-style chunks with `choices[0].message.content`
/// instead, so both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// A single streamed choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
    #[serde(default)]
    pub message: Option<ChunkDelta>,
}

/// Incremental message content
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Extract the text delta, preferring the delta field over the
    /// full-message fallback
    pub fn text_delta(&self) -> Option<String> {
        let choice = self.choices.first()?;
        choice
            .delta
            .as_ref()
            .and_then(|delta| delta.content.clone())
            .or_else(|| {
                choice
                    .message
                    .as_ref()
                    .and_then(|message| message.content.clone())
            })
    }
}

// ---------------------------------------------------------------------------
// Gemini generateContent API
// ---------------------------------------------------------------------------

/// Gemini generateContent request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A Gemini content block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

/// A single Gemini text part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Gemini generation parameters
#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Gemini generateContent response
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// A single Gemini candidate
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
}

impl GenerateContentResponse {
    /// Extract the answer text from the first candidate
    ///
    /// Missing candidates, content or parts are treated as an empty
    /// answer rather than an error.
    pub fn answer_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}
