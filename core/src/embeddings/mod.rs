use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum EmbedderError {
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// A text embedding model.
///
/// The same model instance must be used at ingestion and query time so that
/// query vectors are comparable with the indexed chunk vectors; the vector
/// dimension is validated against the index once at startup.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedderError>;

    /// Embed a batch of document chunks, preserving input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedderError>;
}
