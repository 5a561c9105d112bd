//! Prompt templates for the copilot components
//!
//! Embedded defaults can be overridden per file from a prompts directory.

mod embedded;
mod loader;

pub use loader::{DocumentContext, GoalContext, PromptLoader, Template};
