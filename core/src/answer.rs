use crate::completion::{CompletionError, CompletionModel};
use crate::document::Document;
use std::sync::Arc;
use tracing::{info, instrument};

/// Answer returned when retrieval produced no context; in that case the
/// language model must not be invoked at all.
pub const NO_CONTEXT_RESPONSE: &str =
    "No relevant information found in trusted sources or PDFs.";

const ANSWER_TEMPLATE: &str = r#"You are an AI-powered assistant trained to help users understand medical documents and health-related questions.

Your job is to provide clear, accurate, and helpful responses based **only on the provided context**.

---
**Context:**
{context}

**User Question:**
{question}

---
**Answer:**
- Respond in a calm, factual, and respectful tone.
- Use simple explanations when needed.
- If the context does not contain the answer, say: "I'm sorry, but I couldn't find relevant information in the provided documents."
- Do NOT make up facts or provide information not present in the context.
- Keep your answers concise and to the point.
- Act like a professional medical assistant.
"#;

/// Joins Document contents in their given (trust-sorted) order with
/// blank-line separation.
#[must_use]
pub fn build_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders retrieved context plus the question into the fixed instruction
/// template and returns the model's raw text reply unmodified.
pub struct AnswerGenerator {
    model: Arc<dyn CompletionModel>,
}

impl AnswerGenerator {
    #[must_use]
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    #[instrument(skip(self, documents, question), fields(context_docs = documents.len()))]
    pub async fn answer(
        &self,
        documents: &[Document],
        question: &str,
    ) -> Result<String, CompletionError> {
        let context = build_context(documents);
        let prompt = ANSWER_TEMPLATE
            .replace("{context}", &context)
            .replace("{question}", question);

        let response = self.model.complete(&prompt).await?;
        info!("Answer generated");
        Ok(response)
    }
}
