//! Model backend errors.

use std::time::Duration;

/// Result type for backend operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors that can occur while talking to a model service.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API key not set: export {0}")]
    MissingApiKey(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Rate limited by model service{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<String> },

    #[error("Model service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from model service: {0}")]
    InvalidResponse(String),

    #[error("Model returned an empty completion")]
    EmptyCompletion,
}

fn retry_hint(retry_after: &Option<String>) -> String {
    retry_after
        .as_ref()
        .map(|secs| format!(" (retry after {secs}s)"))
        .unwrap_or_default()
}
