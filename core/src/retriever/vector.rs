use super::{FetchError, RetrievalOutcome, Retriever};
use crate::document::Document;
use crate::embeddings::EmbeddingModel;
use crate::vector_store::VectorStore;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

const DEFAULT_TOP_K: usize = 5;

/// Trust weight of indexed PDF chunks: above web, below literature.
pub const PDF_WEIGHT: f64 = 0.9;

/// Source label attached to every chunk retrieved from the index.
pub const PDF_SOURCE: &str = "Uploaded PDF";

/// Nearest-neighbor retrieval over previously ingested PDF chunks.
///
/// The embedder must be the same instance used at ingestion time; the
/// dimension precondition is enforced once at startup, not per call.
pub struct VectorRetriever {
    embedder: Arc<dyn EmbeddingModel>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl VectorRetriever {
    #[must_use]
    pub fn new(embedder: Arc<dyn EmbeddingModel>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            top_k: DEFAULT_TOP_K,
        }
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Document>, FetchError> {
        let query_vector = self.embedder.embed_query(query).await?;
        let matches = self.store.query(&query_vector, self.top_k).await?;
        debug!(count = matches.len(), "Vector store returned matches");

        let docs = matches
            .into_iter()
            .filter_map(|m| {
                // Chunks are stored with their text mirrored into metadata;
                // matches without it are unusable and skipped.
                let content = m.metadata.get("text")?.as_str()?.to_string();
                if content.is_empty() {
                    return None;
                }
                let mut metadata = m.metadata;
                metadata.insert("score".to_string(), json!(m.score));
                Some(Document::new(content, PDF_SOURCE, PDF_WEIGHT).with_metadata(metadata))
            })
            .collect();
        Ok(docs)
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    fn name(&self) -> &'static str {
        "pdf"
    }

    async fn retrieve(&self, query: &str) -> RetrievalOutcome {
        match self.fetch(query).await {
            Ok(docs) => RetrievalOutcome::success(docs),
            Err(e) => {
                error!(error = %e, "Vector retrieval failed");
                RetrievalOutcome::failure(e.to_string())
            }
        }
    }
}
