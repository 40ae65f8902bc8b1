mod error;
mod handlers;
mod router;
mod state;

use anyhow::Context;
use medrag::analysis::ReportAnalyzer;
use medrag::answer::AnswerGenerator;
use medrag::completion::CompletionModel;
use medrag::config::Config;
use medrag::embeddings::EmbeddingModel;
use medrag::ingest::IngestPipeline;
use medrag::providers::completions::GroqCompletionModel;
use medrag::providers::embeddings::OpenAIEmbeddingModel;
use medrag::report_log::ReportLog;
use medrag::retriever::{HybridRetriever, PubMedRetriever, TrustedWebRetriever, VectorRetriever};
use medrag::vector_store::{PineconeVectorStore, VectorStore};
use state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Configuration is incomplete")?;
    let state = init(&config).await?;

    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "medrag-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Builds every shared handle exactly once. Any failure here (unreachable
/// index, dimension mismatch) aborts startup instead of surfacing later as
/// per-request errors.
async fn init(config: &Config) -> anyhow::Result<AppState> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")?;

    let store: Arc<dyn VectorStore> = Arc::new(
        PineconeVectorStore::new(
            http.clone(),
            &config.pinecone_index_host,
            &config.pinecone_api_key,
            config.pinecone_namespace.clone(),
        )
        .await
        .context("Failed to connect to the vector index")?,
    );
    if store.dimension() != config.embedding_dim {
        anyhow::bail!(
            "Embedding dimension {} does not match index dimension {}",
            config.embedding_dim,
            store.dimension()
        );
    }

    let embedder: Arc<dyn EmbeddingModel> = Arc::new(OpenAIEmbeddingModel::new(
        http.clone(),
        config.embedding_api_url.clone(),
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
    ));
    let completion: Arc<dyn CompletionModel> = Arc::new(GroqCompletionModel::new(
        http.clone(),
        config.groq_api_url.clone(),
        config.groq_api_key.clone(),
        config.groq_model.clone(),
    ));

    let hybrid = Arc::new(HybridRetriever::new(
        Arc::new(PubMedRetriever::new(http.clone())),
        Arc::new(TrustedWebRetriever::new(http.clone())),
        Arc::new(VectorRetriever::new(embedder.clone(), store.clone())),
    ));

    Ok(AppState {
        hybrid,
        pipeline: Arc::new(IngestPipeline::new(
            embedder,
            store,
            config.upload_dir.clone(),
        )),
        answerer: Arc::new(AnswerGenerator::new(completion.clone())),
        analyzer: Arc::new(ReportAnalyzer::new(completion)),
        report_log: Arc::new(ReportLog::new(config.report_log_path.clone())),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
