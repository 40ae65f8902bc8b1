use crate::completion::{CompletionError, CompletionModel};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, instrument};

const DEFAULT_TEMP: f64 = 0.2;

/// Chat-completion client for the Groq API (OpenAI-compatible wire format).
///
/// Pointing `api_url` at any other OpenAI-compatible `/chat/completions`
/// endpoint works as well; tests use this to target a mock server.
pub struct GroqCompletionModel {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl GroqCompletionModel {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: DEFAULT_TEMP,
        }
    }
}

#[async_trait]
impl CompletionModel for GroqCompletionModel {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request_body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Request failed");
                CompletionError::RequestError(e.to_string())
            })?;

        let status = response.status();
        debug!(%status, "Received API response");

        if !status.is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error (failed to read response body)".to_string());
            error!(status = %status, error = %error_msg, "API returned error response");
            return Err(CompletionError::ProviderError(status.into(), error_msg));
        }

        let response_json: serde_json::Value = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response JSON");
            CompletionError::ParseError(e.to_string())
        })?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                error!("Missing content in completion response");
                CompletionError::ParseError("Invalid response body".to_string())
            })?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn parses_chat_completion_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "okay" } }]
            })))
            .mount(&server)
            .await;

        let model = GroqCompletionModel::new(
            reqwest::Client::new(),
            format!("{}/chat/completions", server.uri()),
            "test-key",
            "test-model",
        );

        let reply = model.complete("say okay").await.unwrap();
        assert_eq!(reply, "okay");
    }

    #[tokio::test]
    async fn surfaces_provider_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let model =
            GroqCompletionModel::new(reqwest::Client::new(), server.uri(), "k", "test-model");

        let err = model.complete("hi").await.unwrap_err();
        assert!(matches!(err, CompletionError::ProviderError(429, _)));
    }
}
