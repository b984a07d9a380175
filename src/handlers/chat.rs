//! Chat proxy handlers
//!
//! Accepts chat prompts, dispatches them to the resolved provider and
//! relays the answer back, either as a chunked plain-text stream or as
//! a single JSON value.

use crate::handlers::AppState;
use crate::models::chat::{validate_chat_request, ChatRequest, ChatResponse};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::create_request_log_summary;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::{debug, error};
use uuid::Uuid;

/// Marker written into an already-open stream when the relay fails.
/// Headers are committed at that point, so a structured error response
/// is no longer possible; the full error goes to the logs instead.
const STREAM_ERROR_MARKER: &str = "\n[stream error]";

/// Handle streaming chat requests
///
/// POST /chat
///
/// The response is an open-ended chunked `text/plain` byte stream of
/// the concatenated fragments, terminated by connection close. Errors
/// raised before the provider stream opens surface as structured JSON
/// errors; after that the connection is closed best-effort.
pub async fn handle_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Response> {
    let request_id = Uuid::new_v4();
    debug!(
        %request_id,
        "Received chat request: {}",
        create_request_log_summary(&request)
    );

    validate_chat_request(&request).map_err(AppError::Validation)?;

    let provider = state.registry.resolve(&request.model);

    // Pre-stream failures (missing credential, upstream rejection)
    // still propagate as structured errors here
    let fragments = provider.stream_complete(&request).await?;

    let body_stream = fragments
        .map(move |fragment| Ok::<_, Infallible>(fragment_to_bytes(fragment, request_id)));

    debug!(%request_id, "Opening outbound fragment stream");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Map one relay item onto outbound body bytes.
///
/// Fragments pass through unchanged. A relay failure can no longer be
/// reported as a structured response (headers are committed), so it is
/// logged and replaced by the closing marker; the relay terminates
/// right after an error, so the marker is the last thing written.
fn fragment_to_bytes(fragment: AppResult<String>, request_id: Uuid) -> Bytes {
    match fragment {
        Ok(text) => Bytes::from(text),
        Err(e) => {
            error!(%request_id, "Relay failed mid-stream: {}", e);
            Bytes::from(STREAM_ERROR_MARKER)
        }
    }
}

/// Handle full-completion chat requests
///
/// POST /chat-sync
///
/// Returns the complete answer as one JSON value once the provider
/// finishes.
pub async fn handle_chat_sync(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> AppResult<impl IntoResponse> {
    let request_id = Uuid::new_v4();
    debug!(
        %request_id,
        "Received sync chat request: {}",
        create_request_log_summary(&request)
    );

    validate_chat_request(&request).map_err(AppError::Validation)?;

    let provider = state.registry.resolve(&request.model);
    let text = provider.complete(&request).await?;

    debug!(%request_id, "Sync chat request completed");

    Ok(Json(ChatResponse { text }))
}
