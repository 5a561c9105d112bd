//! LLM request/response types for BizOps
//!
//! These types model the Gemini `generateContent` API closely enough to map
//! one-to-one onto its wire format while staying independent of it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::schema::Schema;

/// A generation request - everything needed for one LLM call
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// System instruction (persona) for this call
    pub system_instruction: Option<String>,

    /// Conversation contents in chronological order; the last entry is the new prompt
    pub contents: Vec<Message>,

    /// Variability coefficient; `None` leaves the service default
    pub temperature: Option<f64>,

    /// Plain text or schema-constrained JSON output
    pub response_format: ResponseFormat,
}

/// Output mode for a request
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json {
        schema: Schema,
    },
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model (assistant) message
    pub fn model(text: impl Into<String>) -> Self {
        debug!("Message::model: called");
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Message role as the service names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Response from a generation request
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    /// Concatenated text of the first candidate, if any
    pub text: Option<String>,

    /// Why the model stopped
    pub finish_reason: FinishReason,

    /// Token usage for diagnostics
    pub usage: TokenUsage,
}

impl GenerateResponse {
    /// Convenience constructor for a plain text reply
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// A reply carrying no text at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collapse the optional text into an explicit outcome
    ///
    /// Whitespace-only text counts as empty.
    pub fn into_completion(self) -> Completion {
        debug!(has_text = self.text.is_some(), "GenerateResponse::into_completion: called");
        match self.text {
            Some(text) if !text.trim().is_empty() => Completion::Text(text),
            _ => {
                debug!("GenerateResponse::into_completion: no usable text");
                Completion::Empty
            }
        }
    }
}

/// Outcome of a successful call: either text or nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Text(String),
    Empty,
}

/// Why the model stopped generating
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FinishReason {
    #[default]
    Stop,
    MaxTokens,
    Safety,
    Other(String),
}

impl FinishReason {
    /// Parse from Gemini finishReason string
    pub fn from_gemini(s: &str) -> Self {
        debug!(%s, "FinishReason::from_gemini: called");
        match s {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => FinishReason::Safety,
            other => {
                debug!(%other, "FinishReason::from_gemini: unrecognised reason");
                FinishReason::Other(other.to_string())
            }
        }
    }
}

/// Token usage reported by the service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}
