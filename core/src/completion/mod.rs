use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("Provider error -> HTTP Status {0}: {1}")]
    ProviderError(u16, String),
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
}

/// A synchronous (non-streaming) language model.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Send a single rendered prompt to the LLM and return the raw text reply.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
