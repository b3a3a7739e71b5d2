use serde::Serialize;
use serde_json::Value;

use super::base::GenerateOptions;
use super::configs::{OpenAiProviderConfig, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use super::utils::{messages_to_spec, tools_to_spec};
use crate::models::conversation::Conversation;

/// Parameters for one chat-completion call.
///
/// Built once per call from a snapshot of the conversation and never mutated
/// afterwards; mutating the conversation later does not alter an already
/// built value. Construction is pure and does no validation — an empty model
/// name, for instance, is the transport's problem.
#[derive(Debug, Clone, Serialize)]
pub struct RequestParameters {
    pub model: String,
    pub messages: Vec<Value>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl RequestParameters {
    /// Resolution for every field: call-time option, then provider
    /// configuration, then hard default.
    pub fn build(
        conversation: &Conversation,
        config: &OpenAiProviderConfig,
        options: &GenerateOptions,
    ) -> Self {
        let stream = options.stream.unwrap_or(config.stream);

        RequestParameters {
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            messages: messages_to_spec(conversation.messages()),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            tools: tools_to_spec(conversation.tools()),
            stream: if stream { Some(true) } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::Message;
    use crate::models::tool::Tool;
    use serde_json::json;

    fn config() -> OpenAiProviderConfig {
        OpenAiProviderConfig::new("test_key".to_string(), "http://localhost".to_string())
    }

    #[test]
    fn test_defaults_apply_when_config_is_silent() {
        let conversation = Conversation::new();
        let parameters =
            RequestParameters::build(&conversation, &config(), &GenerateOptions::default());

        assert_eq!(parameters.model, DEFAULT_MODEL);
        assert_eq!(parameters.temperature, DEFAULT_TEMPERATURE);
        assert!(parameters.tools.is_empty());
        assert_eq!(parameters.stream, None);
    }

    #[test]
    fn test_config_values_override_defaults() {
        let conversation = Conversation::new();
        let config = config().with_model("gpt-4o").with_temperature(0.2);
        let parameters =
            RequestParameters::build(&conversation, &config, &GenerateOptions::default());

        assert_eq!(parameters.model, "gpt-4o");
        assert_eq!(parameters.temperature, 0.2);
    }

    #[test]
    fn test_call_option_wins_over_config_stream() {
        let conversation = Conversation::new();

        let streaming_config = config().with_stream(true);
        let opt_out = GenerateOptions {
            stream: Some(false),
            stream_observer: None,
        };
        let parameters = RequestParameters::build(&conversation, &streaming_config, &opt_out);
        assert_eq!(parameters.stream, None);

        let parameters = RequestParameters::build(
            &conversation,
            &config(),
            &GenerateOptions::streaming(),
        );
        assert_eq!(parameters.stream, Some(true));
    }

    #[test]
    fn test_messages_are_a_snapshot() {
        let mut conversation = Conversation::new();
        conversation.push_message(Message::user().with_text("Hello"));

        let parameters =
            RequestParameters::build(&conversation, &config(), &GenerateOptions::default());
        conversation.push_message(Message::assistant().with_text("later"));

        assert_eq!(parameters.messages.len(), 1);
        assert_eq!(parameters.messages[0]["content"], "Hello");
    }

    #[test]
    fn test_serialized_shape_omits_empty_fields() {
        let mut conversation = Conversation::new();
        conversation.push_message(Message::user().with_text("Hi"));
        let parameters =
            RequestParameters::build(&conversation, &config(), &GenerateOptions::default());

        let payload = serde_json::to_value(&parameters).unwrap();
        assert!(payload.get("tools").is_none());
        assert!(payload.get("stream").is_none());
        assert_eq!(payload["model"], DEFAULT_MODEL);

        conversation.add_tool(Tool::new("t", "a tool", json!({"type": "object"})));
        let parameters = RequestParameters::build(
            &conversation,
            &config(),
            &GenerateOptions::streaming(),
        );
        let payload = serde_json::to_value(&parameters).unwrap();
        assert_eq!(payload["tools"].as_array().unwrap().len(), 1);
        assert_eq!(payload["stream"], true);
    }
}
