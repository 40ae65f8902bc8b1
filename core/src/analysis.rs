use crate::completion::{CompletionError, CompletionModel};
use regex::Regex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::sync::LazyLock;
use tracing::{instrument, warn};

const ANALYSIS_TEMPLATE: &str = r#"You are a medical analyst AI assistant analyzing a patient's lab report.

Report Text:
{report_text}

Return in **strict JSON format** as below:
{
  "parameters": ["Parameter name and value if available"],
  "summary": "A short summary of the key findings and abnormalities."
}
"#;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```json([\s\S]*?)```|```([\s\S]*?)```").expect("fence pattern is valid")
});

static BARE_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("brace pattern is valid"));

/// Pulls a JSON object out of a raw model reply.
///
/// Tries a fenced ```json block first, then the widest bare `{...}` span.
/// When nothing parses, the reply is preserved under a `raw_text` key rather
/// than discarded.
#[must_use]
pub fn extract_json(raw: &str) -> Value {
    let candidate = FENCED_JSON
        .captures(raw)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .or_else(|| BARE_JSON.find(raw).map(|m| m.as_str().trim().to_string()));

    if let Some(text) = candidate {
        match serde_json::from_str(&text) {
            Ok(value) => return value,
            Err(e) => warn!(error = %e, "LLM reply contained unparseable JSON"),
        }
    }
    json!({ "raw_text": raw })
}

/// Structured lab-report analysis: renders the strict-JSON prompt over the
/// full extracted report text and parses the reply.
pub struct ReportAnalyzer {
    model: Arc<dyn CompletionModel>,
}

impl ReportAnalyzer {
    #[must_use]
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    #[instrument(skip(self, report_text), fields(report_len = report_text.len()))]
    pub async fn analyze(&self, report_text: &str) -> Result<Value, CompletionError> {
        let prompt = ANALYSIS_TEMPLATE.replace("{report_text}", report_text);
        let raw = self.model.complete(&prompt).await?;
        Ok(extract_json(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_json_block() {
        let raw = "Here you go:\n```json\n{\"summary\": \"Mild anemia.\"}\n```\nRegards";
        assert_eq!(extract_json(raw), json!({ "summary": "Mild anemia." }));
    }

    #[test]
    fn parses_unlabeled_fence() {
        let raw = "```\n{\"parameters\": []}\n```";
        assert_eq!(extract_json(raw), json!({ "parameters": [] }));
    }

    #[test]
    fn falls_back_to_bare_braces() {
        let raw = "The analysis is {\"summary\": \"Borderline glucose.\"} as requested.";
        assert_eq!(extract_json(raw), json!({ "summary": "Borderline glucose." }));
    }

    #[test]
    fn unparseable_reply_is_kept_under_raw_text() {
        let raw = "I could not produce JSON, sorry.";
        assert_eq!(extract_json(raw), json!({ "raw_text": raw }));
    }

    #[test]
    fn broken_json_is_kept_under_raw_text() {
        let raw = "```json\n{\"summary\": \n```";
        assert_eq!(extract_json(raw), json!({ "raw_text": raw }));
    }

    #[tokio::test]
    async fn analyzer_returns_parsed_value() {
        use async_trait::async_trait;

        struct CannedModel;

        #[async_trait]
        impl CompletionModel for CannedModel {
            async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
                Ok("```json\n{\"parameters\": [\"Hemoglobin 11.2 g/dL\"], \"summary\": \"Mild anemia.\"}\n```".to_string())
            }
        }

        let analyzer = ReportAnalyzer::new(Arc::new(CannedModel));
        let analysis = analyzer.analyze("Hemoglobin 11.2 g/dL").await.unwrap();
        assert_eq!(analysis["summary"], json!("Mild anemia."));
        assert_eq!(analysis["parameters"][0], json!("Hemoglobin 11.2 g/dL"));
    }
}
