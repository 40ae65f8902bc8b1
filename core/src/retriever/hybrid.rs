use super::{is_patient_query, Retriever, SourceStatus};
use crate::document::Document;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-source result status attached to a [`RetrievalSummary`], so callers
/// can distinguish "source had no matches" from "source failed".
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReport {
    pub source: &'static str,
    pub status: SourceStatus,
}

/// The merged, trust-ordered retrieval result.
///
/// An empty `documents` list is a valid, non-error result meaning "no
/// relevant context found"; callers must answer with the no-information
/// message instead of invoking the language model on empty context.
#[derive(Debug, Clone)]
pub struct RetrievalSummary {
    pub documents: Vec<Document>,
    pub sources: Vec<SourceReport>,
}

/// Composes the three retrieval sources per query classification and merges
/// their results ordered by trust weight.
pub struct HybridRetriever {
    literature: Arc<dyn Retriever>,
    web: Arc<dyn Retriever>,
    vector: Arc<dyn Retriever>,
}

impl HybridRetriever {
    #[must_use]
    pub fn new(
        literature: Arc<dyn Retriever>,
        web: Arc<dyn Retriever>,
        vector: Arc<dyn Retriever>,
    ) -> Self {
        Self {
            literature,
            web,
            vector,
        }
    }

    /// Retrieves context for `query` from the source subset selected by the
    /// classifier.
    ///
    /// Patient-specific queries skip the web source: personal lab data is
    /// unlikely to appear in public search results, which would only dilute
    /// precision. The per-source calls run concurrently; concatenation order
    /// is fixed by source type (never by completion order) so that the
    /// stable weight sort has a deterministic tie-break.
    pub async fn retrieve(&self, query: &str) -> RetrievalSummary {
        let (documents, sources) = if is_patient_query(query) {
            debug!("Detected patient-specific query, skipping web source");
            let (pdf, literature) =
                tokio::join!(self.vector.retrieve(query), self.literature.retrieve(query));
            let sources = vec![
                SourceReport {
                    source: self.vector.name(),
                    status: pdf.status,
                },
                SourceReport {
                    source: self.literature.name(),
                    status: literature.status,
                },
            ];
            let mut docs = pdf.documents;
            docs.extend(literature.documents);
            (docs, sources)
        } else {
            debug!("General medical query, using all sources");
            let (literature, pdf, web) = tokio::join!(
                self.literature.retrieve(query),
                self.vector.retrieve(query),
                self.web.retrieve(query)
            );
            let sources = vec![
                SourceReport {
                    source: self.literature.name(),
                    status: literature.status,
                },
                SourceReport {
                    source: self.vector.name(),
                    status: pdf.status,
                },
                SourceReport {
                    source: self.web.name(),
                    status: web.status,
                },
            ];
            let mut docs = literature.documents;
            docs.extend(pdf.documents);
            docs.extend(web.documents);
            (docs, sources)
        };

        let documents = merge_by_weight(documents);
        info!(total = documents.len(), "Hybrid retrieval complete");
        RetrievalSummary { documents, sources }
    }
}

/// Stable sort by trust weight descending; equal weights keep their
/// concatenation order.
fn merge_by_weight(mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    documents
}
