use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============= API Request/Response Types =============

/// Body of `POST /chat`.
///
/// A missing `message` field is treated the same as an empty one.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question.
    #[serde(default)]
    pub message: String,
}

/// Body returned by `POST /chat`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The answer, or a fixed apology.
    pub response: String,
}

impl ChatResponse {
    /// Wrap an answer.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

// ============= RAG Types =============

/// A stored text chunk.
///
/// Chunks are written by an offline ingestion step and never modified here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique id within its collection.
    pub id: String,
    /// Chunk text.
    pub content: String,
    /// Free-form metadata from ingestion.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Stored vector, if the backend returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Document {
    /// Document without metadata or embedding.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
            embedding: None,
        }
    }

    /// Attach an embedding.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// One retrieved chunk and its similarity to the query.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched chunk.
    pub document: Document,
    /// Higher is more similar.
    pub score: f32,
}

// ============= Error Types =============

/// Errors raised inside the pipeline. None of them reach HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad or incomplete configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Store missing, unreadable or unreachable.
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// Query embedding failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Generation failed.
    #[error("LLM error: {0}")]
    LLM(String),

    /// A named resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input, e.g. a dimension mismatch.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias for [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_missing_message_is_empty() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.message, "");
    }

    #[test]
    fn test_document_without_metadata_parses() {
        let doc: Document =
            serde_json::from_str(r#"{"id": "a", "content": "text", "embedding": [1.0, 0.5]}"#)
                .unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.embedding, Some(vec![1.0, 0.5]));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::LLM("quota exceeded".to_string());
        assert_eq!(err.to_string(), "LLM error: quota exceeded");
    }
}
