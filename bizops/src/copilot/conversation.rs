//! Conversation Manager - threads a transcript into chat requests
//!
//! The manager never owns conversation state. The caller keeps the
//! [`Transcript`], passes it in on every turn, and appends both the user turn
//! and the reply afterwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::error::{ChatError, FailureCause};
use crate::llm::{Completion, GenerateRequest, LlmClient, Message, ResponseFormat, Role};
use crate::prompts::{PromptLoader, Template};

/// Reply used when the service answers without any text
pub const PLACEHOLDER_REPLY: &str = "I processed that request but could not generate a textual response.";

/// Text of the assistant turn a caller appends after a failed chat turn
pub const ERROR_TURN_TEXT: &str =
    "I encountered an error processing your request. Please check your network or API configuration.";

/// Opening assistant turn of a fresh chat session
pub const GREETING: &str = "Hello. I am your Business Operations Copilot. I can assist with supply chain inquiries, \
                            HR policy generation, or operational data analysis. How can I help you optimize today?";

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl From<TurnRole> for Role {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Model,
        }
    }
}

/// One message exchanged in a conversation
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    id: Uuid,
    role: TurnRole,
    text: String,
    created_at: DateTime<Utc>,
    is_error: bool,
}

impl Turn {
    fn new(role: TurnRole, text: String, is_error: bool) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            text,
            created_at: Utc::now(),
            is_error,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text.into(), false)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, text.into(), false)
    }

    /// The fixed assistant turn shown after a failed request
    pub fn error() -> Self {
        Self::new(TurnRole::Assistant, ERROR_TURN_TEXT.to_string(), true)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Re-express the turn as a role-tagged request entry
    pub fn to_message(&self) -> Message {
        Message {
            role: self.role.into(),
            text: self.text.clone(),
        }
    }
}

/// Ordered, append-only conversation history
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript opening with the copilot greeting
    pub fn with_greeting() -> Self {
        Self {
            turns: vec![Turn::assistant(GREETING)],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        debug!(role = ?turn.role, is_error = turn.is_error, "Transcript::push: called");
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Sends chat turns to the operations copilot persona
pub struct ConversationManager {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
}

impl ConversationManager {
    /// Variability coefficient for chat replies
    pub const TEMPERATURE: f64 = 0.7;

    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>) -> Self {
        debug!(model = %llm.model(), "ConversationManager::new: called");
        Self { llm, prompts }
    }

    /// Build the request for `message` following `prior`
    ///
    /// `prior` is passed through in the order given, error turns included.
    pub fn build_request(&self, message: &str, prior: &[Turn]) -> Result<GenerateRequest, FailureCause> {
        debug!(prior_len = %prior.len(), "build_request: called");
        let system_instruction = self
            .prompts
            .text(Template::Copilot)
            .map_err(|e| FailureCause::Prompt(e.to_string()))?;

        let mut contents: Vec<Message> = prior.iter().map(Turn::to_message).collect();
        contents.push(Message::user(message));

        Ok(GenerateRequest {
            system_instruction: Some(system_instruction),
            contents,
            temperature: Some(Self::TEMPERATURE),
            response_format: ResponseFormat::Text,
        })
    }

    /// Send one user message with its prior transcript and return the reply text
    ///
    /// The transcript is not modified. A reply without text yields
    /// [`PLACEHOLDER_REPLY`]; every failure becomes a [`ChatError`].
    pub async fn send_turn(&self, message: &str, prior: &[Turn]) -> Result<String, ChatError> {
        debug!(message_len = %message.len(), prior_len = %prior.len(), "send_turn: called");
        match self.try_send_turn(message, prior).await {
            Ok(reply) => Ok(reply),
            Err(cause) => {
                error!(kind = %cause.kind(), error = %cause, "send_turn: chat request failed");
                Err(ChatError::from(cause))
            }
        }
    }

    async fn try_send_turn(&self, message: &str, prior: &[Turn]) -> Result<String, FailureCause> {
        let request = self.build_request(message, prior)?;
        let response = self.llm.generate(request).await?;
        debug!(usage = ?response.usage, "try_send_turn: response received");

        match response.into_completion() {
            Completion::Text(text) => Ok(text),
            Completion::Empty => {
                info!("Chat reply carried no text, using placeholder");
                Ok(PLACEHOLDER_REPLY.to_string())
            }
        }
    }
}
