//! Logging utilities
//!
//! Helpers for keeping request logs readable

use crate::models::chat::ChatRequest;

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let head: String = s.chars().take(max_len).collect();
        format!(
            "{}... ({} chars truncated)",
            head,
            s.chars().count() - max_len
        )
    } else {
        s.to_string()
    }
}

/// Create a filtered summary of an inbound chat request for logging
///
/// Keeps the structure but truncates the prompt so debug logs stay short.
pub fn create_request_log_summary(request: &ChatRequest) -> serde_json::Value {
    serde_json::json!({
        "model": request.model,
        "prompt": truncate_content(&request.prompt, 200),
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    })
}
