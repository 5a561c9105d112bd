//! BizOps - Business Operations Copilot
//!
//! A thin, typed core around a hosted generative-language API. All the
//! "intelligence" lives on the service side; this crate owns the request
//! contracts, conversation history threading, and failure normalization.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and Gemini implementation
//! - [`copilot`] - Conversation manager, plan requester, document analyzer
//! - [`prompts`] - Embedded and overridable prompt templates
//! - [`dashboard`] - Static executive overview data
//! - [`render`] - Terminal rendering
//! - [`chat`] - Interactive chat session
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod chat;
pub mod cli;
pub mod config;
pub mod copilot;
pub mod dashboard;
pub mod llm;
pub mod prompts;
pub mod render;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use copilot::{
    AnalysisError, ChatError, ConversationManager, DocumentAnalyzer, FailureKind, PlanError, PlanRequester, PlanStep,
    RequestState, StrategyPlan, Transcript, Turn, TurnRole,
};
pub use llm::{GeminiClient, LlmClient, LlmError};
