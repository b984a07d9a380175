//! Chat Relay Server
//!
//! HTTP proxy that forwards chat prompts to text-generation providers
//! and streams the answers back to the client

use anyhow::{Context, Result};
use tracing::info;

mod config;
mod handlers;
mod models;
mod providers;
mod relay;
mod services;
mod utils;

use config::Settings;
use handlers::create_router;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    handlers::health::init_start_time();

    // Load settings from environment
    let settings = Settings::new().context("Failed to load server settings")?;
    info!("Server settings loaded");

    // Create router
    let app = create_router(settings.clone()).await?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Chat relay server started!");
    info!("📝 Health check: http://{}/health", addr);
    info!("🔄 Streaming endpoint: http://{}/chat", addr);
    info!("🔄 Sync endpoint: http://{}/chat-sync", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}

/// Initialize logging system
fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let use_json = std::env::var("LOG_FORMAT")
        .map(|format| format.to_lowercase() == "json")
        .unwrap_or(false);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false);

    if use_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
