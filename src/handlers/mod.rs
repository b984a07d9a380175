//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod chat;
pub mod health;

use crate::config::Settings;
use crate::services::ProviderRegistry;
use anyhow::Result;
use axum::http::HeaderValue;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Shared per-process state; configuration lives in the layers and the
/// registry built from it
pub struct AppState {
    pub registry: ProviderRegistry,
}

/// Create application router
pub async fn create_router(settings: Settings) -> Result<Router> {
    // Build the provider registry once; adapters are shared across requests
    let registry = ProviderRegistry::from_settings(&settings)?;

    let app_state = Arc::new(AppState { registry });

    let mut router = Router::new()
        .route("/chat", post(chat::handle_chat))
        .route("/chat-sync", post(chat::handle_chat_sync))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .with_state(app_state);

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(settings.request.max_request_size));

    router = router.layer(middleware_stack);

    if settings.security.cors_enabled {
        router = router.layer(build_cors_layer(&settings.security.allowed_origins));
    }

    Ok(router)
}

/// Build the CORS layer from the configured origins
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
