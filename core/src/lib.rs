//! # medrag
//!
//! Retrieval-augmented question answering over medical documents.
//!
//! Uploaded PDF lab reports are split into overlapping chunks, embedded and
//! indexed in a vector store. Questions are answered by blending context from
//! three heterogeneous sources before a single LLM call:
//!
//! - previously indexed PDF chunks (highest trust for patient data),
//! - PubMed abstracts fetched through the NCBI E-utilities,
//! - web search results filtered to an allow-list of trusted health domains.
//!
//! The [`retriever::HybridRetriever`] classifies each question as
//! patient-specific or general, fans out to the matching subset of sources,
//! and merges the results ordered by trust weight. An empty merge result is a
//! valid answer ("no relevant information found") and must not reach the LLM.
//!
//! ## Components
//!
//! - **Retrieval**: [`retriever`] — per-source retrievers plus the hybrid
//!   orchestrator and query classifier
//! - **Ingestion**: [`ingest`] — PDF staging, page extraction, chunking and
//!   batched vector upserts
//! - **Providers**: [`completion`] and [`embeddings`] — LLM and embedding
//!   model clients over OpenAI-compatible HTTP APIs
//! - **Storage**: [`vector_store`] — Pinecone and in-memory backends;
//!   [`report_log`] — the append-only upload metadata log
//! - **Generation**: [`answer`] and [`analysis`] — the question-answering
//!   prompt and the structured lab-report analysis

/// Structured analysis of a full lab report through the LLM
pub mod analysis;

/// Context formatting and answer generation
pub mod answer;

/// Language model completion support
pub mod completion;

/// Environment-driven configuration, validated once at startup
pub mod config;

/// Retrieval result representation
pub mod document;

/// Text embeddings support
pub mod embeddings;

/// Error types for all library operations
pub mod error;

/// PDF ingestion pipeline: staging, extraction, chunking, upserting
pub mod ingest;

/// Append-only metadata log for uploaded reports
pub mod report_log;

/// Builtin completion and embedding model providers
pub mod providers;

/// Per-source retrievers, query classification and hybrid orchestration
pub mod retriever;

/// Vector storage and nearest-neighbor retrieval
pub mod vector_store;
