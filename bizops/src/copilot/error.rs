//! Failure taxonomy for the copilot components
//!
//! Every component collapses its failures into one opaque error with a fixed,
//! user-presentable message. The structured cause stays attached for logging
//! and for callers that need to tell, say, an auth failure from a rate limit.

use thiserror::Error;

use crate::llm::LlmError;

/// Coarse classification of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network or service unreachable, or the service rejected the call
    TransportFailure,
    /// The service answered without a payload
    EmptyResponse,
    /// A payload arrived but could not be parsed or did not conform
    MalformedResponse,
    /// The request could not be built from its prompt template
    PromptFailure,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TransportFailure => "transport failure",
            Self::EmptyResponse => "empty response",
            Self::MalformedResponse => "malformed response",
            Self::PromptFailure => "prompt failure",
        };
        write!(f, "{}", name)
    }
}

/// The underlying reason a component call failed
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Empty response from model")]
    Empty,

    #[error("Response is not valid plan JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response failed validation: {0}")]
    Invalid(String),

    #[error("Prompt could not be rendered: {0}")]
    Prompt(String),
}

impl FailureCause {
    pub fn kind(&self) -> FailureKind {
        match self {
            FailureCause::Llm(e) if e.is_transport() => FailureKind::TransportFailure,
            FailureCause::Llm(_) => FailureKind::MalformedResponse,
            FailureCause::Empty => FailureKind::EmptyResponse,
            FailureCause::Json(_) | FailureCause::Invalid(_) => FailureKind::MalformedResponse,
            FailureCause::Prompt(_) => FailureKind::PromptFailure,
        }
    }

    /// The client-layer error, when the failure came from the service call
    pub fn llm_error(&self) -> Option<&LlmError> {
        match self {
            FailureCause::Llm(e) => Some(e),
            _ => None,
        }
    }
}

macro_rules! component_error {
    ($(#[$meta:meta])* $name:ident, $message:tt) => {
        $(#[$meta])*
        #[derive(Debug, Error)]
        #[error($message)]
        pub struct $name(#[source] FailureCause);

        impl $name {
            /// Fixed message shown to users for this failure
            pub const MESSAGE: &'static str = $message;

            pub fn kind(&self) -> FailureKind {
                self.0.kind()
            }

            pub fn cause(&self) -> &FailureCause {
                &self.0
            }
        }

        impl From<FailureCause> for $name {
            fn from(cause: FailureCause) -> Self {
                Self(cause)
            }
        }
    };
}

component_error!(
    /// Failure of a chat turn
    ChatError,
    "Failed to communicate with BizOps AI."
);

component_error!(
    /// Failure to produce a strategy plan
    PlanError,
    "Failed to generate strategic plan."
);

component_error!(
    /// Failure of a document analysis
    AnalysisError,
    "Failed to analyze document."
);
