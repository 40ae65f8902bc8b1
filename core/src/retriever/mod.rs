mod classifier;
mod hybrid;
mod pubmed;
mod vector;
mod web;

pub use classifier::is_patient_query;
pub use hybrid::{HybridRetriever, RetrievalSummary, SourceReport};
pub use pubmed::PubMedRetriever;
pub use vector::VectorRetriever;
pub use web::TrustedWebRetriever;

use crate::document::Document;
use crate::embeddings::EmbedderError;
use crate::vector_store::VectorStoreError;
use async_trait::async_trait;
use thiserror::Error;

/// Why a retrieval source produced no usable call, kept internal: retrievers
/// never surface errors to callers, only a [`SourceStatus`].
#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Embedder(#[from] EmbedderError),
    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),
}

/// Outcome of one retrieval source. "No matches" and "source failed" both
/// carry an empty document list but are distinguishable by status, so the
/// orchestrator and tests can tell partial degradation from a true miss.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceStatus {
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RetrievalOutcome {
    pub documents: Vec<Document>,
    pub status: SourceStatus,
}

impl RetrievalOutcome {
    pub fn success(documents: Vec<Document>) -> Self {
        Self {
            documents,
            status: SourceStatus::Succeeded,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            documents: Vec::new(),
            status: SourceStatus::Failed(reason.into()),
        }
    }
}

/// A retrieval source. Implementations must degrade to an empty outcome on
/// any failure instead of propagating a hard error.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Stable source label used in per-source reports.
    fn name(&self) -> &'static str;

    async fn retrieve(&self, query: &str) -> RetrievalOutcome;
}
