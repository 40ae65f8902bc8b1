use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::{VectorMatch, VectorRecord, VectorStore, VectorStoreError};
use async_trait::async_trait;

const RETRIES: u8 = 3;

/// Pinecone data-plane client over plain HTTP.
///
/// The index must already exist; its dimension is read from
/// `describe_index_stats` during construction so the caller can verify it
/// against the embedding model before serving traffic.
#[derive(Debug)]
pub struct PineconeVectorStore {
    client: Client,
    api_key: String,
    base_url: Url,
    namespace: Option<String>,
    dimension: usize,
}

#[derive(Deserialize)]
struct IndexStats {
    dimension: usize,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

impl PineconeVectorStore {
    /// Connects to the index host and probes it for availability and its
    /// configured dimension.
    ///
    /// # Errors
    /// Fails if the host URL is invalid or the index stats cannot be fetched
    /// after a few attempts.
    pub async fn new(
        client: Client,
        host: &str,
        api_key: impl Into<String>,
        namespace: Option<String>,
    ) -> Result<Self, VectorStoreError> {
        let url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        let base_url =
            Url::parse(&url).map_err(|e| VectorStoreError::FailedToCreateStore(e.to_string()))?;
        let api_key = api_key.into();

        let mut attempts = 0u8;
        let stats: IndexStats = loop {
            let response = client
                .post(join(&base_url, "describe_index_stats")?)
                .header("Api-Key", &api_key)
                .json(&json!({}))
                .send()
                .await
                .map_err(|e| VectorStoreError::FailedToCreateStore(e.to_string()))?;

            if response.status().is_success() {
                break response
                    .json()
                    .await
                    .map_err(|e| VectorStoreError::FailedToCreateStore(e.to_string()))?;
            }
            attempts += 1;
            if attempts >= RETRIES {
                return Err(VectorStoreError::FailedToCreateStore(format!(
                    "Failed to fetch index stats: HTTP {}",
                    response.status()
                )));
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
        };

        info!(dimension = stats.dimension, "Connected to Pinecone index");
        Ok(Self {
            client,
            api_key,
            base_url,
            namespace,
            dimension: stats.dimension,
        })
    }
}

fn join(base: &Url, path: &str) -> Result<Url, VectorStoreError> {
    base.join(path)
        .map_err(|e| VectorStoreError::FailedToCreateStore(e.to_string()))
}

#[async_trait]
impl VectorStore for PineconeVectorStore {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<(), VectorStoreError> {
        let mut body = json!({ "vectors": records });
        if let Some(namespace) = &self.namespace {
            body["namespace"] = json!(namespace);
        }

        let response = self
            .client
            .post(join(&self.base_url, "vectors/upsert")?)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VectorStoreError::FailedUpsert(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let msg = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::FailedUpsert(format!(
                "HTTP {status}: {msg}"
            )));
        }
        debug!("Upsert batch accepted");
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorMatch>, VectorStoreError> {
        let mut body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        if let Some(namespace) = &self.namespace {
            body["namespace"] = json!(namespace);
        }

        let response = self
            .client
            .post(join(&self.base_url, "query")?)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VectorStoreError::FailedQuery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let msg = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::FailedQuery(format!(
                "HTTP {status}: {msg}"
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::FailedQuery(e.to_string()))?;
        Ok(parsed.matches)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
