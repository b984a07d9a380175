//! Provider module
//!
//! Defines the Provider trait and the adapter implementations

pub mod gemini;
pub mod openai;
pub mod simulated;

use crate::models::chat::ChatRequest;
use crate::utils::error::AppResult;
use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

/// A boxed stream of text fragments
///
/// Concatenating every fragment in emission order yields the full
/// answer text.
pub type FragmentStream = Pin<Box<dyn Stream<Item = AppResult<String>> + Send + 'static>>;

/// Provider trait for upstream text-generation providers
///
/// One adapter per provider; each invocation performs exactly one
/// outbound network call and no retries. Provider errors propagate
/// immediately to the caller.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Generate the complete answer as a single value
    async fn complete(&self, request: &ChatRequest) -> AppResult<String>;

    /// Generate the answer as a lazy sequence of text fragments
    async fn stream_complete(&self, request: &ChatRequest) -> AppResult<FragmentStream>;
}

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use simulated::SimulatedProvider;
