use std::env;

use anyhow::Result;

use super::stream::StreamObserver;

/// Model used when neither the configuration nor the environment names one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub trait ProviderConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self>
    where
        Self: Sized;

    /// Helper function to get environment variables with error handling
    fn get_env(key: &str, required: bool, default: Option<String>) -> Result<Option<String>> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) if !required => Ok(default),
            Err(env::VarError::NotPresent) => Err(anyhow::anyhow!(
                "Environment variable '{}' is required but not set.",
                key
            )),
            Err(e) => Err(e.into()),
        }
    }
}

/// Configuration for an OpenAI-compatible chat-completion endpoint.
///
/// Unset fields fall back to hard defaults when a request is built; per-call
/// options override both.
#[derive(Clone)]
pub struct OpenAiProviderConfig {
    pub api_key: String,
    pub host: String,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    /// Stream responses unless the call says otherwise.
    pub stream: bool,
    /// Observer invoked per applied chunk when streaming.
    pub stream_observer: Option<StreamObserver>,
}

impl OpenAiProviderConfig {
    pub fn new(api_key: String, host: String) -> Self {
        Self {
            api_key,
            host,
            model: None,
            temperature: None,
            stream: false,
            stream_observer: None,
        }
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_stream_observer(mut self, observer: StreamObserver) -> Self {
        self.stream_observer = Some(observer);
        self
    }
}

impl ProviderConfig for OpenAiProviderConfig {
    fn from_env() -> Result<Self> {
        let api_key = Self::get_env("OPENAI_API_KEY", true, None)?
            .ok_or_else(|| anyhow::anyhow!("OpenAI API key should be present"))?;

        let host = Self::get_env(
            "OPENAI_HOST",
            false,
            Some("https://api.openai.com".to_string()),
        )?
        .unwrap_or_else(|| "https://api.openai.com".to_string());

        let model = Self::get_env("OPENAI_MODEL", false, None)?;

        let temperature = match Self::get_env("OPENAI_TEMPERATURE", false, None)? {
            Some(raw) => Some(raw.parse::<f32>().map_err(|e| {
                anyhow::anyhow!("OPENAI_TEMPERATURE must be a float: {}", e)
            })?),
            None => None,
        };

        let stream = Self::get_env("OPENAI_STREAM", false, Some("false".to_string()))?
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);

        let mut config = Self::new(api_key, host).with_stream(stream);
        config.model = model;
        config.temperature = temperature;
        Ok(config)
    }
}
