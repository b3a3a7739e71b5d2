//! The value types passed between the agent framework and a generation
//! provider.
//!
//! A [`conversation::Conversation`] owns an ordered sequence of
//! [`message::Message`]s plus the [`tool::Tool`]s the model may request.
//! Providers append completed messages to the conversation and mutate
//! in-flight messages while a response streams in; everything else is
//! immutable after construction.
pub mod action;
pub mod conversation;
pub mod message;
pub mod role;
pub mod tool;
