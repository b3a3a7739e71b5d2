use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Unified wrapper for any failure during a generation call (transport
    /// failure, unexpected payload shape). Carries the description of the
    /// original cause.
    #[error("generation provider error: {0}")]
    Generation(String),

    /// A tool call's argument payload could not be parsed. A corrupt tool
    /// call cannot be safely acted upon, so this aborts the whole message.
    #[error("malformed tool call '{name}': {detail}")]
    MalformedToolCall { name: String, detail: String },

    /// A stream chunk addressed a response index with no in-flight message.
    /// Chunks must arrive after the chunk that establishes their index.
    #[error("no in-flight message for response index {index}")]
    UnknownResponseIndex { index: usize },
}

pub type ProviderResult<T> = Result<T, ProviderError>;

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Generation(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Generation(err.to_string())
    }
}
