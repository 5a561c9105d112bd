//! LLM Client module for BizOps
//!
//! Provides the client seam, the Gemini implementation, and the typed
//! request/response model shared by the copilot components.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
pub mod schema;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use schema::{ResponseSchema, Schema, SchemaType};
pub use types::{
    Completion, FinishReason, GenerateRequest, GenerateResponse, Message, ResponseFormat, Role, TokenUsage,
};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports the "gemini" provider.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" | "google" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::Config(format!(
                "Unknown LLM provider: '{}'. Supported: gemini",
                other
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_create_client_unknown_provider() {
        let config = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(matches!(err, LlmError::Config(ref m) if m.contains("carrier-pigeon")));
    }

    #[test]
    #[serial]
    fn test_create_client_missing_key() {
        let config = LlmConfig {
            api_key_env: "BIZOPS_TEST_CREATE_CLIENT_NO_KEY".to_string(),
            ..Default::default()
        };
        unsafe { std::env::remove_var("BIZOPS_TEST_CREATE_CLIENT_NO_KEY") };
        let err = create_client(&config).err().unwrap();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    #[serial]
    fn test_create_client_gemini() {
        let config = LlmConfig {
            api_key_env: "BIZOPS_TEST_CREATE_CLIENT_KEY".to_string(),
            model: "gemini-2.5-pro".to_string(),
            ..Default::default()
        };
        // SAFETY: serialized with every other env-mutating test
        unsafe { std::env::set_var("BIZOPS_TEST_CREATE_CLIENT_KEY", "abc") };
        let client = create_client(&config).unwrap();
        assert_eq!(client.model(), "gemini-2.5-pro");
        unsafe { std::env::remove_var("BIZOPS_TEST_CREATE_CLIENT_KEY") };
    }
}
