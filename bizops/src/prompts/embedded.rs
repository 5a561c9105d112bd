//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Chat persona: operations-advisory system instruction
pub const COPILOT: &str = include_str!("../../prompts/copilot.pmt");

/// Document analysis system instruction
pub const ANALYST: &str = include_str!("../../prompts/analyst.pmt");

/// Document analysis prompt (expects `document`)
pub const ANALYZE: &str = include_str!("../../prompts/analyze.pmt");

/// Strategy plan prompt (expects `goal`)
pub const STRATEGY: &str = include_str!("../../prompts/strategy.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "copilot" => Some(COPILOT),
        "analyst" => Some(ANALYST),
        "analyze" => Some(ANALYZE),
        "strategy" => Some(STRATEGY),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
