//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// Check if this is an authentication failure
    pub fn is_auth(&self) -> bool {
        matches!(self, LlmError::ApiError { status: 401 | 403, .. })
    }

    /// Short hint shown to the user next to the error
    pub fn hint(&self) -> Option<&'static str> {
        if self.is_rate_limit() {
            return Some("The provider is rate limiting requests; wait a moment and try again.");
        }
        if self.is_auth() {
            return Some("Check your API key with `tkp config`.");
        }
        match self {
            LlmError::ApiError { status: 404, .. } => Some("Check the model name with `tkp config`."),
            LlmError::Network(_) => Some("Check your network connection."),
            LlmError::Config(_) => Some("Run `tkp config` to fix your configuration."),
            _ => None,
        }
    }
}
