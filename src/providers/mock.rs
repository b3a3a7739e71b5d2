use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::base::{GenerateOptions, GenerationResult, Provider, Usage};
use crate::errors::ProviderResult;
use crate::models::conversation::Conversation;
use crate::models::message::Message;

/// A mock provider that returns pre-configured responses for testing
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Message>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Message>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate(
        &self,
        conversation: &mut Conversation,
        _options: &GenerateOptions,
    ) -> ProviderResult<GenerationResult> {
        let mut responses = self.responses.lock().unwrap();
        let message = if responses.is_empty() {
            // Return an empty response if no more pre-configured responses
            Message::assistant().with_text("")
        } else {
            responses.remove(0)
        };

        conversation.push_message(message.clone());
        Ok(GenerationResult {
            message,
            usage: Usage::default(),
            raw_response: Value::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_replays_responses_in_order() -> ProviderResult<()> {
        let provider: Box<dyn Provider> = Box::new(MockProvider::new(vec![
            Message::assistant().with_text("first"),
            Message::assistant().with_text("second"),
        ]));

        let mut conversation = Conversation::new();
        conversation.push_message(Message::user().with_text("go"));

        let result = provider
            .generate(&mut conversation, &GenerateOptions::default())
            .await?;
        assert_eq!(result.message.content, "first");

        let result = provider
            .generate(&mut conversation, &GenerateOptions::default())
            .await?;
        assert_eq!(result.message.content, "second");

        // Exhausted mocks fall back to an empty assistant message.
        let result = provider
            .generate(&mut conversation, &GenerateOptions::default())
            .await?;
        assert_eq!(result.message.content, "");

        assert_eq!(conversation.messages().len(), 4);
        Ok(())
    }
}
