use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::stream::StreamObserver;
use crate::errors::ProviderResult;
use crate::models::conversation::Conversation;
use crate::models::message::Message;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// The outcome of one generation call.
///
/// The caller keeps ownership of the conversation it passed in; by the time
/// it holds a result, `message` has already been appended there.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub message: Message,
    pub usage: Usage,
    /// Opaque raw payload from the service, retained for diagnostics. For a
    /// streamed call this is the ordered chunk sequence. Parallel choices
    /// beyond index 0 are only available here.
    pub raw_response: Value,
}

/// Per-call overrides. Anything set here wins over the provider
/// configuration, which in turn wins over hard defaults.
#[derive(Clone, Default)]
pub struct GenerateOptions {
    pub stream: Option<bool>,
    pub stream_observer: Option<StreamObserver>,
}

impl GenerateOptions {
    pub fn streaming() -> Self {
        GenerateOptions {
            stream: Some(true),
            stream_observer: None,
        }
    }

    pub fn with_stream_observer(mut self, observer: StreamObserver) -> Self {
        self.stream_observer = Some(observer);
        self
    }
}

/// Base trait for generation providers (OpenAI, compatible endpoints, ...)
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the next message for the conversation, appending it to the
    /// conversation's history before returning.
    async fn generate(
        &self,
        conversation: &mut Conversation,
        options: &GenerateOptions,
    ) -> ProviderResult<GenerationResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn test_usage_creation() {
        let usage = Usage::new(Some(10), Some(20), Some(30));
        assert_eq!(usage.input_tokens, Some(10));
        assert_eq!(usage.output_tokens, Some(20));
        assert_eq!(usage.total_tokens, Some(30));
    }

    #[test]
    fn test_usage_serialization() -> Result<()> {
        let usage = Usage::new(Some(10), Some(20), Some(30));
        let serialized = serde_json::to_string(&usage)?;
        let deserialized: Usage = serde_json::from_str(&serialized)?;

        assert_eq!(usage.input_tokens, deserialized.input_tokens);
        assert_eq!(usage.output_tokens, deserialized.output_tokens);
        assert_eq!(usage.total_tokens, deserialized.total_tokens);

        let json_value: serde_json::Value = serde_json::from_str(&serialized)?;
        assert_eq!(json_value["input_tokens"], json!(10));
        assert_eq!(json_value["output_tokens"], json!(20));
        assert_eq!(json_value["total_tokens"], json!(30));

        Ok(())
    }
}
