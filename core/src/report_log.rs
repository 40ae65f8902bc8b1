use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReportLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed log file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Metadata for one successfully ingested lab report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub chunks: usize,
}

/// Append-only JSON-array log of uploaded reports.
///
/// Reads return the full array, or an empty list when the file does not
/// exist yet. Writes are serialized through an internal mutex so concurrent
/// ingestions cannot lose appends.
pub struct ReportLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ReportLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Appends a record for `filename` and returns it.
    pub async fn append(
        &self,
        filename: &str,
        chunks: usize,
    ) -> Result<ReportRecord, ReportLogError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await?;
        let record = ReportRecord {
            filename: filename.to_string(),
            uploaded_at: Utc::now(),
            chunks,
        };
        records.push(record.clone());

        let serialized = serde_json::to_vec_pretty(&records)?;
        tokio::fs::write(&self.path, serialized).await?;
        debug!(%filename, chunks, "Report metadata appended");
        Ok(record)
    }

    /// Returns all records in append order.
    pub async fn list(&self) -> Result<Vec<ReportRecord>, ReportLogError> {
        self.read_all().await
    }

    async fn read_all(&self) -> Result<Vec<ReportRecord>, ReportLogError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
