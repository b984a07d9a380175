//! Chat Relay Library
//!
//! Proxies chat prompts to third-party text-generation providers and
//! relays the answers back as a live fragment stream or a single value

pub mod config;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod relay;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, AppState};
pub use models::{ChatRequest, ChatResponse};
pub use services::ProviderRegistry;
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
