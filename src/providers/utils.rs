use serde_json::{json, Value};

use crate::errors::{ProviderError, ProviderResult};
use crate::models::action::Action;
use crate::models::message::Message;
use crate::models::role::Role;
use crate::models::tool::Tool;

/// Convert message history to the chat-completion wire shape.
pub fn messages_to_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::new();

    for message in messages {
        let mut converted = json!({
            "role": message.role,
            "content": message.content,
        });

        if !message.requested_actions.is_empty() {
            let tool_calls: Vec<Value> = message
                .requested_actions
                .iter()
                .map(|action| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": action.name,
                            "arguments": Value::Object(action.params.clone()).to_string(),
                        }
                    })
                })
                .collect();
            converted
                .as_object_mut()
                .unwrap()
                .insert("tool_calls".to_string(), json!(tool_calls));
        }

        messages_spec.push(converted);
    }

    messages_spec
}

/// Convert the conversation's tools to the function-tool wire shape.
pub fn tools_to_spec(tools: &[Tool]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            })
        })
        .collect()
}

/// Normalize a completed (non-streaming) response into a Message.
///
/// Only `choices[0]` is read; parallel choices beyond it stay available in
/// the raw payload for callers to consult separately.
pub fn response_to_message(response: &Value) -> ProviderResult<Message> {
    let choice = response
        .pointer("/choices/0")
        .ok_or_else(|| ProviderError::Generation("response contained no choices".to_string()))?;

    let message_json = choice.get("message").ok_or_else(|| {
        ProviderError::Generation("first choice carried no message object".to_string())
    })?;

    let role = message_json
        .get("role")
        .and_then(Value::as_str)
        .and_then(Role::from_wire)
        .ok_or_else(|| {
            ProviderError::Generation("first choice had a missing or unknown role".to_string())
        })?;

    let content = message_json
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let action_requested =
        choice.get("finish_reason").and_then(Value::as_str) == Some("tool_calls");

    let requested_actions = match message_json.get("tool_calls").and_then(Value::as_array) {
        Some(entries) => actions_from_tool_calls(entries)?,
        None => Vec::new(),
    };

    if action_requested && requested_actions.is_empty() {
        return Err(ProviderError::Generation(
            "finish reason was tool_calls but the message carried no tool calls".to_string(),
        ));
    }

    let mut message = Message::new(role).with_text(content);
    message.action_requested = action_requested;
    message.requested_actions = requested_actions;
    message.response_index = choice.get("index").and_then(Value::as_u64).unwrap_or(0) as usize;

    Ok(message)
}

/// One Action per tool-call entry, in entry order. A single malformed entry
/// aborts the whole message; a partially-populated action set is never
/// returned.
fn actions_from_tool_calls(entries: &[Value]) -> ProviderResult<Vec<Action>> {
    entries
        .iter()
        .map(|entry| {
            let name = entry
                .pointer("/function/name")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ProviderError::Generation("tool call entry had no function name".to_string())
                })?;
            // An absent arguments field is a corrupt entry; a tool that
            // takes no arguments sends the text "{}".
            let arguments = entry
                .pointer("/function/arguments")
                .and_then(Value::as_str)
                .ok_or_else(|| ProviderError::MalformedToolCall {
                    name: name.to_string(),
                    detail: "tool call entry carried no arguments text".to_string(),
                })?;
            Action::from_raw(name, arguments)
        })
        .collect()
}
