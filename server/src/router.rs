use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    ask_handler, health_handler, list_reports_handler, upload_and_analyze_handler,
    upload_pdfs_handler,
};
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/upload_pdfs", post(upload_pdfs_handler))
        .route("/ask", post(ask_handler))
        .route("/upload_and_analyze_report", post(upload_and_analyze_handler))
        .route("/list_reports", get(list_reports_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use medrag::analysis::ReportAnalyzer;
    use medrag::answer::{AnswerGenerator, NO_CONTEXT_RESPONSE};
    use medrag::completion::{CompletionError, CompletionModel};
    use medrag::document::Document;
    use medrag::embeddings::{EmbedderError, EmbeddingModel};
    use medrag::ingest::IngestPipeline;
    use medrag::report_log::ReportLog;
    use medrag::retriever::{HybridRetriever, RetrievalOutcome, Retriever};
    use medrag::vector_store::InMemoryVectorStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FakeSource {
        name: &'static str,
        documents: Vec<Document>,
    }

    #[async_trait]
    impl Retriever for FakeSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn retrieve(&self, _query: &str) -> RetrievalOutcome {
            RetrievalOutcome::success(self.documents.clone())
        }
    }

    struct CountingModel {
        reply: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionModel for CountingModel {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    struct FakeEmbedder;

    #[async_trait]
    impl EmbeddingModel for FakeEmbedder {
        async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, EmbedderError> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedderError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    struct TestApp {
        router: Router,
        model: Arc<CountingModel>,
        report_log: Arc<ReportLog>,
        _dir: tempfile::TempDir,
    }

    fn make_app(retrieved: Vec<Document>) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(CountingModel {
            reply: "canned answer",
            calls: AtomicUsize::new(0),
        });
        let embedder = Arc::new(FakeEmbedder);
        let store = Arc::new(InMemoryVectorStore::new(2));
        let report_log = Arc::new(ReportLog::new(dir.path().join("uploaded_reports.json")));

        let hybrid = Arc::new(HybridRetriever::new(
            Arc::new(FakeSource {
                name: "pubmed",
                documents: retrieved,
            }),
            Arc::new(FakeSource {
                name: "web",
                documents: vec![],
            }),
            Arc::new(FakeSource {
                name: "pdf",
                documents: vec![],
            }),
        ));

        let state = AppState {
            hybrid,
            pipeline: Arc::new(IngestPipeline::new(embedder, store, dir.path())),
            answerer: Arc::new(AnswerGenerator::new(model.clone())),
            analyzer: Arc::new(ReportAnalyzer::new(model.clone())),
            report_log: report_log.clone(),
        };

        TestApp {
            router: build_router(state),
            model,
            report_log,
            _dir: dir,
        }
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn ask_request(question: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(format!("question={question}")))
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = make_app(vec![]);
        let resp = app
            .router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(json_body(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn empty_retrieval_answers_without_invoking_the_model() {
        let app = make_app(vec![]);
        let resp = app.router.clone().oneshot(ask_request("anything")).await.unwrap();

        assert_eq!(resp.status(), 200);
        let json = json_body(resp).await;
        assert_eq!(json["response"], NO_CONTEXT_RESPONSE);
        assert_eq!(app.model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ask_returns_answer_and_deduplicated_sources() {
        let docs = vec![
            Document::new("abstract one", "PubMed PMID:1", 1.0),
            Document::new("abstract two", "PubMed PMID:1", 1.0),
            Document::new("chunk", "Uploaded PDF", 0.9),
        ];
        let app = make_app(docs);
        let resp = app.router.clone().oneshot(ask_request("question")).await.unwrap();

        assert_eq!(resp.status(), 200);
        let json = json_body(resp).await;
        assert_eq!(json["response"], "canned answer");
        assert_eq!(
            json["sources"],
            serde_json::json!(["PubMed PMID:1", "Uploaded PDF"])
        );
        assert_eq!(app.model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn list_reports_reflects_the_log() {
        let app = make_app(vec![]);

        let resp = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/list_reports")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_body(resp).await["message"], "No reports uploaded yet.");

        app.report_log.append("cbc.pdf", 7).await.unwrap();
        let resp = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/list_reports")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = json_body(resp).await;
        assert_eq!(json["uploaded_reports"].as_array().unwrap().len(), 1);
        assert_eq!(json["uploaded_reports"][0]["filename"], "cbc.pdf");
        assert_eq!(json["uploaded_reports"][0]["chunks"], 7);
    }
}
