use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The HTTP request to the provider could not be sent or completed.
    #[error("Completion request failed: {0}")]
    RequestError(String),
    /// The provider responded but the body could not be deserialized.
    #[error("Failed to parse completion response: {0}")]
    ParseError(String),
    /// The provider rejected the request (quota, auth, safety block).
    #[error("Completion provider error: {0}")]
    ProviderError(String),
}

#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Sends `prompt` to the language model and returns its text completion.
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError>;
}
