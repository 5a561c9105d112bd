//! Copilot components
//!
//! Three independent components share one LLM client seam and one failure
//! taxonomy:
//!
//! - [`ConversationManager`]: multi-turn chat over a caller-owned [`Transcript`]
//! - [`PlanRequester`]: schema-constrained [`StrategyPlan`] generation
//! - [`DocumentAnalyzer`]: free-text analysis of pasted documents

mod analyzer;
mod conversation;
mod error;
mod state;
mod strategy;

pub use analyzer::{DocumentAnalyzer, EMPTY_ANALYSIS};
pub use conversation::{ConversationManager, ERROR_TURN_TEXT, GREETING, PLACEHOLDER_REPLY, Transcript, Turn, TurnRole};
pub use error::{AnalysisError, ChatError, FailureCause, FailureKind, PlanError};
pub use state::{RequestState, StateError};
pub use strategy::{PlanRequester, PlanStep, StrategyPlan};
