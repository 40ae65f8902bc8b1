use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_GROQ_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
const DEFAULT_EMBEDDING_API_URL: &str = "https://api.openai.com/v1/embeddings";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_EMBEDDING_DIM: usize = 384;
const DEFAULT_UPLOAD_DIR: &str = "./uploaded_docs";
const DEFAULT_REPORT_LOG: &str = "uploaded_reports.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{0}`")]
    MissingVar(&'static str),
    #[error("invalid value for `{0}`: {1}")]
    InvalidVar(&'static str, String),
}

/// Process-wide configuration, read from the environment exactly once at
/// startup. A missing required variable aborts initialization rather than
/// failing per-request.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub groq_model: String,

    pub embedding_api_key: String,
    pub embedding_api_url: String,
    pub embedding_model: String,
    /// Dimension the vector index was created with; the embedding model must
    /// produce vectors of exactly this size.
    pub embedding_dim: usize,

    pub pinecone_api_key: String,
    pub pinecone_index_host: String,
    pub pinecone_namespace: Option<String>,

    pub upload_dir: PathBuf,
    pub report_log_path: PathBuf,
    pub bind_addr: String,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if a required variable is absent or a
    /// numeric variable fails to parse. Callers must treat this as fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let embedding_dim = match std::env::var("EMBEDDING_DIM") {
            Ok(v) => v
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidVar("EMBEDDING_DIM", e.to_string()))?,
            Err(_) => DEFAULT_EMBEDDING_DIM,
        };

        Ok(Self {
            groq_api_key: required("GROQ_API_KEY")?,
            groq_api_url: optional("GROQ_API_URL", DEFAULT_GROQ_API_URL),
            groq_model: optional("GROQ_MODEL", DEFAULT_GROQ_MODEL),

            embedding_api_key: required("EMBEDDING_API_KEY")?,
            embedding_api_url: optional("EMBEDDING_API_URL", DEFAULT_EMBEDDING_API_URL),
            embedding_model: optional("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            embedding_dim,

            pinecone_api_key: required("PINECONE_API_KEY")?,
            pinecone_index_host: required("PINECONE_INDEX_HOST")?,
            pinecone_namespace: std::env::var("PINECONE_NAMESPACE").ok(),

            upload_dir: PathBuf::from(optional("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            report_log_path: PathBuf::from(optional("REPORT_LOG_PATH", DEFAULT_REPORT_LOG)),
            bind_addr: optional("BIND_ADDR", DEFAULT_BIND_ADDR),
        })
    }
}
