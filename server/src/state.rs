use medrag::analysis::ReportAnalyzer;
use medrag::answer::AnswerGenerator;
use medrag::ingest::IngestPipeline;
use medrag::report_log::ReportLog;
use medrag::retriever::HybridRetriever;
use std::sync::Arc;

/// Shared handles built once at startup and injected into every handler.
/// All fields are read-only after construction.
#[derive(Clone)]
pub struct AppState {
    pub hybrid: Arc<HybridRetriever>,
    pub pipeline: Arc<IngestPipeline>,
    pub answerer: Arc<AnswerGenerator>,
    pub analyzer: Arc<ReportAnalyzer>,
    pub report_log: Arc<ReportLog>,
}
