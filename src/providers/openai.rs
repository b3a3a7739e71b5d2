use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::base::{GenerateOptions, GenerationResult, Provider, Usage};
use super::configs::OpenAiProviderConfig;
use super::request::RequestParameters;
use super::stream::StreamAggregator;
use super::utils::response_to_message;
use crate::errors::{ProviderError, ProviderResult};
use crate::models::conversation::Conversation;
use crate::models::role::Role;

pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    fn get_usage(data: &Value) -> Usage {
        // Streamed responses carry no usage block; absent counts stay None.
        let usage = match data.get("usage") {
            Some(usage) => usage,
            None => return Usage::default(),
        };

        let input_tokens = usage
            .get("prompt_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let output_tokens = usage
            .get("completion_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let total_tokens = usage
            .get("total_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32)
            .or_else(|| match (input_tokens, output_tokens) {
                (Some(input), Some(output)) => Some(input + output),
                _ => None,
            });

        Usage::new(input_tokens, output_tokens, total_tokens)
    }

    async fn post(&self, parameters: &RequestParameters) -> ProviderResult<reqwest::Response> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(parameters)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::Generation(format!(
                    "server error: {}: {}",
                    status, body
                )))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::Generation(format!(
                    "request failed: {}: {}",
                    status, body
                )))
            }
        }
    }

    async fn generate_completion(
        &self,
        conversation: &mut Conversation,
        parameters: RequestParameters,
    ) -> ProviderResult<GenerationResult> {
        let response: Value = self.post(&parameters).await?.json().await?;

        if let Some(error) = response.get("error") {
            return Err(ProviderError::Generation(format!("API error: {}", error)));
        }

        let message = response_to_message(&response)?;
        let usage = Self::get_usage(&response);

        // The sole context mutation for a non-streamed response, and only
        // after the message is fully constructed.
        conversation.push_message(message.clone());

        Ok(GenerationResult {
            message,
            usage,
            raw_response: response,
        })
    }

    async fn generate_streamed(
        &self,
        conversation: &mut Conversation,
        parameters: RequestParameters,
        options: &GenerateOptions,
    ) -> ProviderResult<GenerationResult> {
        let observer = options
            .stream_observer
            .clone()
            .or_else(|| self.config.stream_observer.clone());
        let aggregator = StreamAggregator::new(observer);

        let response = self.post(&parameters).await?;
        let mut body = response.bytes_stream();

        let mut chunks: Vec<Value> = Vec::new();
        let mut pending = String::new();
        let mut primary_index: Option<usize> = None;

        'receive: while let Some(bytes) = body.next().await {
            let bytes = bytes?;
            pending.push_str(&String::from_utf8_lossy(&bytes));

            // SSE events are newline-delimited; a partial line stays pending
            // until the next read completes it.
            while let Some(line_end) = pending.find('\n') {
                let line = pending[..line_end].trim().to_string();
                pending.drain(..=line_end);

                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                if data.trim() == "[DONE]" {
                    break 'receive;
                }

                let chunk: Value = match serde_json::from_str(data) {
                    Ok(value) => value,
                    Err(err) => {
                        tracing::warn!(%err, "skipping unparseable stream line");
                        continue;
                    }
                };

                self.apply_streamed_chunk(conversation, &aggregator, &chunk, &mut primary_index)?;
                chunks.push(chunk);
            }
        }

        let index = primary_index.ok_or_else(|| {
            ProviderError::Generation("stream ended before any chunk established a message".to_string())
        })?;
        let message = conversation
            .streaming_message_mut(index)
            .ok_or(ProviderError::UnknownResponseIndex { index })?;
        message.end_streaming();
        let message = message.clone();

        // Tool-call fragments and finish reasons for a streamed turn are
        // finalized by the surrounding framework; the result carries the
        // accumulated content and the raw chunk sequence.
        Ok(GenerationResult {
            message,
            usage: Usage::default(),
            raw_response: Value::Array(chunks),
        })
    }

    fn apply_streamed_chunk(
        &self,
        conversation: &mut Conversation,
        aggregator: &StreamAggregator,
        chunk: &Value,
        primary_index: &mut Option<usize>,
    ) -> ProviderResult<()> {
        // The first chunk for a choice carries the role, establishing the
        // in-flight message for its index.
        if let Some(role) = chunk.pointer("/choices/0/delta/role").and_then(Value::as_str) {
            let index = chunk
                .pointer("/choices/0/index")
                .and_then(Value::as_u64)
                .ok_or_else(|| {
                    ProviderError::Generation("stream chunk carried no response index".to_string())
                })? as usize;
            let role = Role::from_wire(role).ok_or_else(|| {
                ProviderError::Generation(format!("stream chunk carried unknown role '{}'", role))
            })?;

            conversation.begin_streaming(role, index);
            if primary_index.is_none() {
                *primary_index = Some(index);
            }
        }

        aggregator.apply_chunk(conversation, chunk)
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn generate(
        &self,
        conversation: &mut Conversation,
        options: &GenerateOptions,
    ) -> ProviderResult<GenerationResult> {
        let parameters = RequestParameters::build(conversation, &self.config, options);
        tracing::debug!(
            model = %parameters.model,
            streaming = parameters.stream.is_some(),
            "dispatching chat completion"
        );

        if parameters.stream.is_some() {
            self.generate_streamed(conversation, parameters, options).await
        } else {
            self.generate_completion(conversation, parameters).await
        }
    }
}
