//! LlmClient trait definition

use async_trait::async_trait;

use super::{GenerateRequest, GenerateResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// Conversation history is never held here; callers pass the full context in
/// every request. Implementations must issue at most one network attempt per
/// call.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single generation request and wait for the full reply
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;
}
