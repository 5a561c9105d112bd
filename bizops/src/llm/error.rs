//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Envelope reasons the service uses for a rejected credential
const AUTH_REASONS: &[&str] = &["API_KEY_INVALID", "API_KEY_EXPIRED"];

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// `reason` is the machine-readable cause from the error envelope, e.g. `API_KEY_INVALID`
    #[error("API error {status}: {message}")]
    ApiError {
        status: u16,
        message: String,
        reason: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Client configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// Check if the service rejected the credential
    ///
    /// Gemini answers a bad key with 400 `API_KEY_INVALID`, so the envelope
    /// reason counts as well as 401/403.
    pub fn is_auth(&self) -> bool {
        match self {
            LlmError::ApiError { status: 401 | 403, .. } => true,
            LlmError::ApiError {
                reason: Some(reason), ..
            } => AUTH_REASONS.contains(&reason.as_str()),
            _ => false,
        }
    }

    /// Check if the failure happened before or while talking to the service,
    /// as opposed to the service answering with something unusable
    pub fn is_transport(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            LlmError::ApiError { .. } => true,
            LlmError::Network(_) => true,
            LlmError::Config(_) => true,
            LlmError::InvalidResponse(_) => false,
            LlmError::Json(_) => false,
        }
    }

    /// Get the retry duration if this is a rate limit error that carried one
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
