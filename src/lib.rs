//! Core types for talking to chat-completion services: building request
//! parameters from a conversation, normalizing completed responses into typed
//! messages and actions, and rebuilding streamed messages chunk by chunk.
//!
//! The transport (HTTP client, credentials, retry policy) and conversation
//! persistence live in the surrounding framework; this crate owns the
//! protocol/state-shape complexity in between.
pub mod errors;
pub mod models;
pub mod providers;
