//! Query embedding providers.
//!
//! The question must be embedded with the same model that produced the stored
//! chunk vectors. The default is all-MiniLM-L6-v2 served by Ollama
//! (`all-minilm`); with the `local-embeddings` feature the same model can run
//! in-process through fastembed.

use crate::types::{AppError, Result};
use crate::utils::config::EmbeddingConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Maps text to a fixed-size vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single piece of text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Build the embedder described by the configuration.
pub async fn create_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    match config {
        EmbeddingConfig::Ollama { base_url, model } => Ok(Box::new(OllamaEmbedder::new(
            base_url.clone(),
            model.clone(),
        ))),

        #[cfg(feature = "local-embeddings")]
        EmbeddingConfig::FastEmbed { model } => {
            Ok(Box::new(local::FastEmbedder::new(model.clone()).await?))
        }

        #[cfg(not(feature = "local-embeddings"))]
        EmbeddingConfig::FastEmbed { model } => Err(AppError::Configuration(format!(
            "fastembed model '{}' requested but ragbot was built without the 'local-embeddings' feature",
            model
        ))),
    }
}

// ============= Ollama =============

/// Embeddings from an Ollama server's `/api/embed` endpoint.
pub struct OllamaEmbedder {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    /// Embed with `model` on the Ollama server at `base_url`.
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .http
            .post(format!("{}/api/embed", self.base_url))
            .json(&EmbedRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Ollama embed request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Embedding(format!(
                "Ollama embed error ({}): {}",
                status, body
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Invalid Ollama embed response: {}", e)))?;

        parsed
            .embeddings
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Embedding("Ollama returned no embedding".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ============= fastembed =============

#[cfg(feature = "local-embeddings")]
mod local {
    use super::Embedder;
    use crate::types::{AppError, Result};
    use async_trait::async_trait;
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// In-process ONNX embedder.
    pub struct FastEmbedder {
        model: Arc<Mutex<TextEmbedding>>,
        name: String,
    }

    fn resolve_model(name: &str) -> Result<EmbeddingModel> {
        match name.trim_start_matches("sentence-transformers/") {
            "all-MiniLM-L6-v2" | "all-minilm" => Ok(EmbeddingModel::AllMiniLML6V2),
            "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            other => Err(AppError::Configuration(format!(
                "Unsupported fastembed model '{}'",
                other
            ))),
        }
    }

    impl FastEmbedder {
        /// Load the model; the first call may download weights.
        pub async fn new(name: String) -> Result<Self> {
            let kind = resolve_model(&name)?;

            let model = tokio::task::spawn_blocking(move || {
                TextEmbedding::try_new(InitOptions::new(kind).with_show_download_progress(true))
            })
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Embedding(e.to_string()))?;

            Ok(Self {
                model: Arc::new(Mutex::new(model)),
                name,
            })
        }
    }

    #[async_trait]
    impl Embedder for FastEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let model = Arc::clone(&self.model);
            let text = text.to_string();

            let mut embeddings = tokio::task::spawn_blocking(move || {
                let mut model = model.lock();
                model.embed(vec![text], None)
            })
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Embedding(e.to_string()))?;

            embeddings
                .pop()
                .ok_or_else(|| AppError::Embedding("fastembed returned no embedding".to_string()))
        }

        fn model_name(&self) -> &str {
            &self.name
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_request_shape() {
        let value = serde_json::to_value(EmbedRequest {
            model: "all-minilm",
            input: "hello",
        })
        .unwrap();

        assert_eq!(value["model"], "all-minilm");
        assert_eq!(value["input"], "hello");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let embedder =
            OllamaEmbedder::new("http://localhost:11434/".to_string(), "all-minilm".to_string());
        assert_eq!(embedder.base_url, "http://localhost:11434");
        assert_eq!(embedder.model_name(), "all-minilm");
    }

    #[cfg(not(feature = "local-embeddings"))]
    #[tokio::test]
    async fn test_fastembed_without_feature() {
        let config = EmbeddingConfig::FastEmbed {
            model: "all-MiniLM-L6-v2".to_string(),
        };

        let err = match create_embedder(&config).await {
            Ok(_) => panic!("Expected error"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("'local-embeddings' feature"));
    }
}
