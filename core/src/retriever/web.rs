use super::{FetchError, RetrievalOutcome, Retriever};
use crate::document::Document;
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error};

const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";

/// Trust weight of filtered web results, the lowest weight in the system.
pub const WEB_WEIGHT: f64 = 0.6;

/// Health domains a web result must mention to be kept.
pub const TRUSTED_DOMAINS: [&str; 8] = [
    "pubmed.ncbi.nlm.nih.gov",
    "www.who.int",
    "www.cdc.gov",
    "www.nih.gov",
    "jamanetwork.com",
    "www.thelancet.com",
    "www.mayoclinic.org",
    "medlineplus.gov",
];

/// Issues one DuckDuckGo search and keeps the result text only when it
/// mentions an allow-listed health domain.
///
/// The raw result text is not segmented per result: every matched domain
/// yields a Document carrying the same full text, exactly as deployed.
pub struct TrustedWebRetriever {
    client: reqwest::Client,
    base_url: String,
}

impl TrustedWebRetriever {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Document>, FetchError> {
        let results_text = self
            .client
            .get(format!("{}/html/", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let docs: Vec<Document> = TRUSTED_DOMAINS
            .iter()
            .filter(|domain| results_text.contains(**domain))
            .map(|domain| {
                let mut metadata = serde_json::Map::new();
                metadata.insert("domain".to_string(), json!(domain));
                Document::new(results_text.clone(), format!("Web ({domain})"), WEB_WEIGHT)
                    .with_metadata(metadata)
            })
            .collect();

        debug!(matched = docs.len(), "Trusted domains matched in web results");
        Ok(docs)
    }
}

#[async_trait]
impl Retriever for TrustedWebRetriever {
    fn name(&self) -> &'static str {
        "web"
    }

    async fn retrieve(&self, query: &str) -> RetrievalOutcome {
        match self.fetch(query).await {
            Ok(docs) => RetrievalOutcome::success(docs),
            Err(e) => {
                error!(error = %e, "Web retrieval failed");
                RetrievalOutcome::failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retriever::SourceStatus;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn one_document_per_matched_domain_sharing_text() {
        let server = MockServer::start().await;
        let body = "Influenza overview - www.cdc.gov ... see also medlineplus.gov for details";
        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let retriever =
            TrustedWebRetriever::new(reqwest::Client::new()).with_base_url(server.uri());
        let outcome = retriever.retrieve("influenza").await;

        assert_eq!(outcome.status, SourceStatus::Succeeded);
        assert_eq!(outcome.documents.len(), 2);
        assert_eq!(outcome.documents[0].source, "Web (www.cdc.gov)");
        assert_eq!(outcome.documents[1].source, "Web (medlineplus.gov)");
        // Unsegmented by design: both documents carry the full result text.
        assert_eq!(outcome.documents[0].content, body);
        assert_eq!(outcome.documents[1].content, body);
        assert!(outcome.documents.iter().all(|d| d.weight == WEB_WEIGHT));
    }

    #[tokio::test]
    async fn untrusted_results_yield_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("random-blog.example.com"))
            .mount(&server)
            .await;

        let retriever =
            TrustedWebRetriever::new(reqwest::Client::new()).with_base_url(server.uri());
        let outcome = retriever.retrieve("influenza").await;
        assert_eq!(outcome.status, SourceStatus::Succeeded);
        assert!(outcome.documents.is_empty());
    }

    #[tokio::test]
    async fn failure_degrades_to_empty_with_failed_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let retriever =
            TrustedWebRetriever::new(reqwest::Client::new()).with_base_url(server.uri());
        let outcome = retriever.retrieve("influenza").await;
        assert!(outcome.documents.is_empty());
        assert!(matches!(outcome.status, SourceStatus::Failed(_)));
    }
}
