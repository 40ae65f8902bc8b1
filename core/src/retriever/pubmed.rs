use super::{FetchError, RetrievalOutcome, Retriever};
use crate::document::Document;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const DEFAULT_MAX_RESULTS: usize = 5;

/// Trust weight of literature abstracts, the highest non-PDF weight.
pub const PUBMED_WEIGHT: f64 = 1.0;

/// Fetches PubMed abstracts for medical context via the NCBI E-utilities.
pub struct PubMedRetriever {
    client: reqwest::Client,
    base_url: String,
    max_results: usize,
}

#[derive(Deserialize)]
struct EsearchResponse {
    esearchresult: EsearchResult,
}

#[derive(Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

impl PubMedRetriever {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    // One try scope for the whole operation: a failure on any fetch drops the
    // batch, matching the deployed behavior.
    async fn fetch(&self, query: &str) -> Result<Vec<Document>, FetchError> {
        let retmax = self.max_results.to_string();
        let search: EsearchResponse = self
            .client
            .get(format!("{}/esearch.fcgi", self.base_url))
            .query(&[
                ("db", "pubmed"),
                ("term", query),
                ("retmax", retmax.as_str()),
                ("retmode", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let ids = search.esearchresult.idlist;
        debug!(count = ids.len(), "PubMed search returned ids");

        let mut docs = Vec::with_capacity(ids.len());
        for pmid in ids {
            let abstract_text = self
                .client
                .get(format!("{}/efetch.fcgi", self.base_url))
                .query(&[
                    ("db", "pubmed"),
                    ("id", pmid.as_str()),
                    ("retmode", "text"),
                    ("rettype", "abstract"),
                ])
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;

            let abstract_text = abstract_text.trim();
            if !abstract_text.is_empty() {
                let mut metadata = serde_json::Map::new();
                metadata.insert("pmid".to_string(), json!(pmid));
                docs.push(
                    Document::new(abstract_text, format!("PubMed PMID:{pmid}"), PUBMED_WEIGHT)
                        .with_metadata(metadata),
                );
            }
        }
        Ok(docs)
    }
}

#[async_trait]
impl Retriever for PubMedRetriever {
    fn name(&self) -> &'static str {
        "pubmed"
    }

    async fn retrieve(&self, query: &str) -> RetrievalOutcome {
        match self.fetch(query).await {
            Ok(docs) => RetrievalOutcome::success(docs),
            Err(e) => {
                error!(error = %e, "PubMed retrieval failed");
                RetrievalOutcome::failure(e.to_string())
            }
        }
    }
}
