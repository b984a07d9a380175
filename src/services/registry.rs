//! Provider registry
//!
//! Maps inbound model identifiers to provider adapter instances.
//! Adding a provider means one `register` call; the handlers never
//! branch on model ids themselves.

use crate::config::Settings;
use crate::providers::{GeminiProvider, OpenAiProvider, Provider, SimulatedProvider};
use crate::utils::error::AppResult;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Model identifier served by the OpenAI adapter
pub const MODEL_ID_CHATGPT: &str = "chatgpt";

/// Model identifier served by the Gemini adapter
pub const MODEL_ID_GEMINI: &str = "gemini";

/// Provider registry
///
/// An unknown model identifier resolves to the simulated fallback
/// adapter rather than failing, so `resolve` is total.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
    fallback: Arc<dyn Provider>,
}

impl ProviderRegistry {
    /// Build the registry from application settings
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let mut registry = Self::empty();

        registry.register(
            MODEL_ID_CHATGPT,
            Arc::new(OpenAiProvider::new(settings.openai.clone())?),
        );
        registry.register(
            MODEL_ID_GEMINI,
            Arc::new(GeminiProvider::new(settings.gemini.clone())?),
        );

        info!(
            "Provider registry initialized with {} live adapters",
            registry.providers.len()
        );

        Ok(registry)
    }

    /// Create a registry with only the simulated fallback
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
            fallback: Arc::new(SimulatedProvider::new()),
        }
    }

    /// Register an adapter for a model identifier
    pub fn register(&mut self, model_id: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(model_id.into(), provider);
    }

    /// Resolve a model identifier to an adapter
    ///
    /// Never fails: unknown identifiers get the simulated fallback.
    pub fn resolve(&self, model_id: &str) -> Arc<dyn Provider> {
        match self.providers.get(model_id) {
            Some(provider) => {
                debug!("Resolved model '{}' to provider '{}'", model_id, provider.name());
                provider.clone()
            }
            None => {
                warn!(
                    "Unknown model '{}', falling back to simulated provider",
                    model_id
                );
                self.fallback.clone()
            }
        }
    }

    /// List all registered model identifiers
    pub fn model_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }
}
