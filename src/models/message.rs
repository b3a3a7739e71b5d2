use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::role::Role;

/// One turn of a conversation with the model.
///
/// Completed messages are treated as append-only; the single exception is
/// [`Message::append_content`], which the stream aggregator uses while a
/// response is still arriving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub created: i64,
    /// May be empty, especially for an in-flight streamed turn.
    pub content: String,
    /// True iff the service ended the turn specifically to request tool
    /// execution (finish reason `tool_calls`). Implies `requested_actions`
    /// is non-empty once the message is complete.
    pub action_requested: bool,
    pub requested_actions: Vec<Action>,
    /// Which parallel choice stream this message belongs to when the service
    /// returns multiple choices.
    pub response_index: usize,
    /// True while the message is still being rebuilt from stream chunks.
    /// Completed messages never carry this, so chunk application can never
    /// reach committed history.
    #[serde(default)]
    pub streaming: bool,
}

impl Message {
    /// Create an empty message with the current timestamp.
    pub fn new(role: Role) -> Self {
        Message {
            role,
            created: Utc::now().timestamp(),
            content: String::new(),
            action_requested: false,
            requested_actions: Vec::new(),
            response_index: 0,
            streaming: false,
        }
    }

    pub fn system() -> Self {
        Message::new(Role::System)
    }

    pub fn user() -> Self {
        Message::new(Role::User)
    }

    pub fn assistant() -> Self {
        Message::new(Role::Assistant)
    }

    /// Set the text content of the message
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.content = text.into();
        self
    }

    /// Set which choice stream the message belongs to
    pub fn with_response_index(mut self, index: usize) -> Self {
        self.response_index = index;
        self
    }

    /// Mark the message as a tool-execution request carrying `actions`.
    pub fn with_requested_actions(mut self, actions: Vec<Action>) -> Self {
        self.action_requested = true;
        self.requested_actions = actions;
        self
    }

    /// Append streamed delta text. Concatenation is order-sensitive, so
    /// chunks must be applied in delivery order.
    pub fn append_content(&mut self, text: &str) {
        self.content.push_str(text);
    }

    /// Mark a streamed turn as no longer in flight. Later chunks for its
    /// response index will fail instead of reaching it.
    pub fn end_streaming(&mut self) {
        self.streaming = false;
    }
}
