use crate::embeddings::{EmbedderError, EmbeddingModel};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Embedding client for OpenAI-compatible `/embeddings` endpoints.
///
/// The backend can be swapped by URL: the hosted OpenAI API, a local
/// text-embeddings-inference server, or a mock server in tests. Whatever is
/// configured must be the same at ingestion and query time.
pub struct OpenAIEmbeddingModel {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAIEmbeddingModel {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn request(&self, input: serde_json::Value) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let request_body = json!({
            "input": input,
            "model": self.model,
        });
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbedderError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            let error_message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmbedderError::ProviderError(error_message));
        }

        let response = response
            .json::<OpenAIEmbeddingResponse>()
            .await
            .map_err(|e| EmbedderError::ParseError(e.to_string()))?;

        // The API may return entries out of order; `index` is authoritative.
        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[derive(Deserialize)]
struct OpenAIEmbeddingResponse {
    pub data: Vec<OpenAIEmbeddingData>,
}

#[derive(Deserialize)]
struct OpenAIEmbeddingData {
    #[serde(default)]
    pub index: usize,
    pub embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingModel for OpenAIEmbeddingModel {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        let mut vectors = self.request(json!(text)).await?;
        vectors
            .pop()
            .ok_or_else(|| EmbedderError::ParseError("Empty embedding response".to_string()))
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let vectors = self.request(json!(texts)).await?;
        if vectors.len() != texts.len() {
            return Err(EmbedderError::ParseError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}
