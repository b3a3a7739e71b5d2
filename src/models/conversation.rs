use serde::{Deserialize, Serialize};

use super::message::Message;
use super::role::Role;
use super::tool::Tool;

/// Ordered message history plus the set of tools available to the model.
///
/// The conversation owns all mutation of its message sequence: providers
/// append completed messages through [`Conversation::push_message`] and reach
/// in-flight streamed messages through
/// [`Conversation::streaming_message_mut`]. Every operation takes the
/// conversation as an explicit argument; a conversation driven by more than
/// one concurrent caller is a precondition violation, which `&mut` access
/// rules out at compile time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
    tools: Vec<Tool>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(tools: Vec<Tool>) -> Self {
        Conversation {
            messages: Vec::new(),
            tools,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn add_tool(&mut self, tool: Tool) {
        self.tools.push(tool);
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Seed the in-flight message for a streamed turn, once the protocol has
    /// established its role and response index (the first chunk for a choice
    /// carries both).
    pub fn begin_streaming(&mut self, role: Role, response_index: usize) -> &mut Message {
        let mut message = Message::new(role).with_response_index(response_index);
        message.streaming = true;
        self.messages.push(message);
        self.messages.last_mut().unwrap()
    }

    /// The message a chunk for `response_index` should be applied to: the
    /// most recently started in-flight message on that choice stream.
    ///
    /// Only messages seeded by [`Conversation::begin_streaming`] and not yet
    /// ended are candidates; completed history shares the default response
    /// index 0 and must never absorb streamed text.
    pub fn streaming_message_mut(&mut self, response_index: usize) -> Option<&mut Message> {
        self.messages
            .iter_mut()
            .rev()
            .find(|message| message.streaming && message.response_index == response_index)
    }
}
