use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{cosine_similarity, VectorMatch, VectorRecord, VectorStore, VectorStoreError};
use async_trait::async_trait;

/// In-memory vector store with a cosine-similarity scan.
///
/// Used as a local/dev backend and as the test double for the Pinecone store.
pub struct InMemoryVectorStore {
    dimension: usize,
    records: RwLock<HashMap<String, VectorRecord>>,
}

impl InMemoryVectorStore {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<(), VectorStoreError> {
        let mut store = self.records.write().await;
        for record in records {
            if record.values.len() != self.dimension {
                return Err(VectorStoreError::DimensionMismatch {
                    index: self.dimension,
                    vector: record.values.len(),
                });
            }
            store.insert(record.id.clone(), record);
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorMatch>, VectorStoreError> {
        if vector.len() != self.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                index: self.dimension,
                vector: vector.len(),
            });
        }
        let store = self.records.read().await;
        let mut results: Vec<VectorMatch> = store
            .values()
            .map(|record| VectorMatch {
                id: record.id.clone(),
                score: cosine_similarity(vector, &record.values),
                metadata: record.metadata.clone(),
            })
            .collect();
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);
        Ok(results)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
