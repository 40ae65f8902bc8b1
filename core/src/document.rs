use serde_json::{Map, Value};

/// A single retrieval result: text content, a human-readable source label,
/// a fixed trust weight and arbitrary metadata.
///
/// Documents are immutable once created and live only for the duration of a
/// request; they are produced by retrievers and consumed by the orchestrator
/// and the answer generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub content: String,
    pub source: String,
    /// Trust weight assigned by source type, used only for sort ordering.
    pub weight: f64,
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>, weight: f64) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            weight,
            metadata: Map::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}
