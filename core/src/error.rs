use crate::{
    completion::CompletionError, config::ConfigError, embeddings::EmbedderError,
    ingest::IngestError, report_log::ReportLogError, vector_store::VectorStoreError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Completion error")]
    Completion(#[from] CompletionError),
    #[error("Embedder error")]
    Embedder(#[from] EmbedderError),
    #[error("VectorStore error")]
    VectorStore(#[from] VectorStoreError),
    #[error("Ingest error")]
    Ingest(#[from] IngestError),
    #[error("ReportLog error")]
    ReportLog(#[from] ReportLogError),
    #[error("Config error")]
    Config(#[from] ConfigError),
}
