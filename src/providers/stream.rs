use std::sync::Arc;

use serde_json::Value;

use crate::errors::{ProviderError, ProviderResult};
use crate::models::conversation::Conversation;
use crate::models::message::Message;

/// Callback invoked with the updated in-flight message after each applied
/// chunk. Configured per call or on the provider; absent means no-op.
pub type StreamObserver = Arc<dyn Fn(&Message) + Send + Sync>;

/// Incrementally rebuilds in-flight messages from delta chunks.
///
/// Chunks for one response index must be applied in delivery order: content
/// is concatenated, so application order matters and there is no
/// backtracking. End-of-stream finalization (marking the turn's tool calls
/// complete) is the surrounding framework's job; this contract is per-chunk
/// only.
pub struct StreamAggregator {
    observer: Option<StreamObserver>,
}

impl StreamAggregator {
    pub fn new(observer: Option<StreamObserver>) -> Self {
        Self { observer }
    }

    /// Apply one chunk to its in-flight message.
    ///
    /// A chunk whose delta carries no `content` adds nothing but still
    /// reaches the observer. A chunk addressing a response index with no
    /// in-flight message is an ordering violation and fails rather than
    /// silently creating a message with an unknown role.
    pub fn apply_chunk(
        &self,
        conversation: &mut Conversation,
        chunk: &Value,
    ) -> ProviderResult<()> {
        let index = chunk
            .pointer("/choices/0/index")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                ProviderError::Generation("stream chunk carried no response index".to_string())
            })? as usize;

        let new_content = chunk.pointer("/choices/0/delta/content").and_then(Value::as_str);
        tracing::debug!(
            index,
            appended = new_content.map(str::len).unwrap_or(0),
            "applying stream chunk"
        );

        let message = conversation
            .streaming_message_mut(index)
            .ok_or(ProviderError::UnknownResponseIndex { index })?;

        if let Some(text) = new_content {
            message.append_content(text);
        }

        if let Some(observer) = &self.observer {
            observer(message);
        }

        Ok(())
    }
}
