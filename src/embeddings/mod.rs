pub mod model;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbedderError {
    /// The HTTP request to the provider could not be sent or completed.
    #[error("Embedding request failed: {0}")]
    RequestError(String),
    /// The provider responded but the body could not be deserialized.
    #[error("Failed to parse embedding response: {0}")]
    ParseError(String),
    /// The provider rejected the request (quota, auth, bad input).
    #[error("Embedding provider error: {0}")]
    ProviderError(String),
}
