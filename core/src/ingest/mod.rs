mod chunker;

use crate::embeddings::{EmbedderError, EmbeddingModel};
use crate::vector_store::{VectorRecord, VectorStore, VectorStoreError};
use chunker::split_text;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument};

const CHUNK_SIZE: usize = 500;
const CHUNK_OVERLAP: usize = 50;
const UPSERT_BATCH_SIZE: usize = 100;

/// Default document-type tag attached to ingested chunks.
pub const DEFAULT_DOC_TYPE: &str = "lab_report";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse PDF: {0}")]
    Pdf(String),
    #[error(transparent)]
    Embedder(#[from] EmbedderError),
    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),
}

/// An uploaded file held in memory before staging.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A bounded text window cut from one extracted page.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub filename: String,
    pub page: usize,
    pub doc_type: String,
}

/// Per-file ingestion result: the produced chunk count, or the error that
/// stopped this file without affecting the rest of the batch.
#[derive(Debug)]
pub struct IngestReport {
    pub filename: String,
    pub outcome: Result<usize, IngestError>,
}

/// Extracts the text of each page of a PDF held in memory.
///
/// Extraction is CPU-bound and runs on the blocking thread pool.
pub async fn extract_pages(bytes: Vec<u8>) -> Result<Vec<String>, IngestError> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
            .map_err(|e| IngestError::Pdf(e.to_string()))
    })
    .await
    .map_err(|e| IngestError::Pdf(format!("Extraction task failed: {e}")))?
}

/// Splits uploaded PDFs into overlapping chunks, embeds them and upserts the
/// vectors in batches, staging each file in the upload directory first.
pub struct IngestPipeline {
    embedder: Arc<dyn EmbeddingModel>,
    store: Arc<dyn VectorStore>,
    upload_dir: PathBuf,
}

impl IngestPipeline {
    #[must_use]
    pub fn new(
        embedder: Arc<dyn EmbeddingModel>,
        store: Arc<dyn VectorStore>,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            embedder,
            store,
            upload_dir: upload_dir.into(),
        }
    }

    /// Ingests a batch of files, one at a time. Each file is processed in its
    /// own scope: a failure is recorded in that file's report and the batch
    /// continues.
    pub async fn ingest(&self, files: Vec<UploadedFile>, doc_type: &str) -> Vec<IngestReport> {
        let mut reports = Vec::with_capacity(files.len());
        for file in files {
            let filename = file.filename.clone();
            let outcome = self.ingest_file(file, doc_type).await;
            match &outcome {
                Ok(chunks) => info!(%filename, chunks, "File ingested"),
                Err(e) => error!(%filename, error = %e, "File ingestion failed"),
            }
            reports.push(IngestReport { filename, outcome });
        }
        reports
    }

    #[instrument(skip(self, file), fields(filename = %file.filename))]
    async fn ingest_file(&self, file: UploadedFile, doc_type: &str) -> Result<usize, IngestError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let staging_path = self.upload_dir.join(&file.filename);
        tokio::fs::write(&staging_path, &file.bytes).await?;

        let pages = extract_pages(file.bytes).await?;
        self.index_pages(&file.filename, &pages, doc_type).await
    }

    /// Chunks already-extracted pages, embeds them and upserts the vectors.
    /// Returns the number of chunks produced for the file.
    ///
    /// Vector ids are `"{filename stem}-{index}"` with a sequential per-file
    /// index, unique within one ingestion batch.
    pub async fn index_pages(
        &self,
        filename: &str,
        pages: &[String],
        doc_type: &str,
    ) -> Result<usize, IngestError> {
        let chunks: Vec<Chunk> = pages
            .iter()
            .enumerate()
            .flat_map(|(page, text)| {
                split_text(text, CHUNK_SIZE, CHUNK_OVERLAP)
                    .into_iter()
                    .map(move |text| Chunk {
                        text,
                        filename: filename.to_string(),
                        page,
                        doc_type: doc_type.to_string(),
                    })
            })
            .collect();

        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_documents(&texts).await?;

        let stem = Path::new(filename)
            .file_stem()
            .map_or_else(|| filename.to_string(), |s| s.to_string_lossy().into_owned());

        let mut records: Vec<VectorRecord> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (chunk, values))| {
                let mut metadata = serde_json::Map::new();
                metadata.insert("filename".to_string(), json!(chunk.filename));
                metadata.insert("type".to_string(), json!(chunk.doc_type));
                metadata.insert("source".to_string(), json!("user_upload"));
                metadata.insert("page".to_string(), json!(chunk.page));
                metadata.insert("text".to_string(), json!(chunk.text));
                VectorRecord {
                    id: format!("{stem}-{i}"),
                    values,
                    metadata,
                }
            })
            .collect();

        let total = records.len();
        while !records.is_empty() {
            let batch: Vec<VectorRecord> = records
                .drain(..records.len().min(UPSERT_BATCH_SIZE))
                .collect();
            self.store.upsert(batch).await?;
        }
        Ok(total)
    }
}
