use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ProviderError;

/// A tool invocation requested by the model.
///
/// `params` is the parsed form of the JSON-encoded argument blob the service
/// sends. Wire keys arrive as strings and stay strings here; this map is the
/// identifier-keyed view of that blob, fixed at this boundary rather than
/// left to ambient parser behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub params: Map<String, Value>,
}

impl Action {
    pub fn new<S: Into<String>>(name: S, params: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Build an action from a raw tool-call entry.
    ///
    /// The argument text must parse as a JSON object. A tool that takes no
    /// arguments sends `{}` and gets an empty map; anything unparseable (or
    /// parseable but not an object) is a malformed tool call, never a
    /// silently-empty parameter set.
    pub fn from_raw(name: &str, arguments_text: &str) -> Result<Self, ProviderError> {
        let params = match serde_json::from_str::<Value>(arguments_text) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(ProviderError::MalformedToolCall {
                    name: name.to_string(),
                    detail: format!("arguments must be a JSON object, got: {}", other),
                })
            }
            Err(err) => {
                return Err(ProviderError::MalformedToolCall {
                    name: name.to_string(),
                    detail: err.to_string(),
                })
            }
        };

        Ok(Self {
            name: name.to_string(),
            params,
        })
    }
}
