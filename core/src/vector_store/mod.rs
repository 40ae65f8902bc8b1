mod in_memory;
mod pinecone;

pub use in_memory::InMemoryVectorStore;
pub use pinecone::PineconeVectorStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("Failed to create store: {0}")]
    FailedToCreateStore(String),
    #[error("Upsert failed: {0}")]
    FailedUpsert(String),
    #[error("Query failed: {0}")]
    FailedQuery(String),
    #[error("Vector dimension mismatch: index expects {index}, got {vector}")]
    DimensionMismatch { index: usize, vector: usize },
}

/// A vector with its stable identifier and attached metadata, as stored in
/// the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Map<String, Value>,
}

/// A nearest-neighbor match returned by [`VectorStore::query`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VectorMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A service supporting batched upserts and nearest-neighbor search over
/// embedded vectors plus attached metadata. The index must pre-exist with a
/// fixed embedding dimension.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<(), VectorStoreError>;

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorMatch>, VectorStoreError>;

    /// The fixed embedding dimension of the backing index. Compared against
    /// the configured embedding model dimension once at startup; a mismatch
    /// is a fatal configuration error, not recoverable per-call.
    fn dimension(&self) -> usize;
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_similarity_of_parallel_vectors_is_one() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_of_orthogonal_vectors_is_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_with_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
