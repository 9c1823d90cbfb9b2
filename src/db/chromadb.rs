//! ChromaDB vector database integration.
//!
//! Talks to a running ChromaDB server over its v1 REST API. The collection is
//! resolved to its id once at connect time; queries send the pre-computed
//! query embedding, so the server never needs its own embedding function.
//!
//! # Feature Flag
//!
//! Enable with `--features chromadb`

use crate::types::{AppError, Document, Result, SearchResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use super::vectorstore::{CollectionStats, VectorStore};

/// ChromaDB server vector store.
pub struct ChromaDBStore {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    collection_id: String,
}

#[derive(Debug, Deserialize)]
struct CollectionModel {
    id: String,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query_embeddings: Vec<&'a [f32]>,
    n_results: usize,
    include: [&'static str; 3],
}

/// Column-oriented query response; the outer vectors have one entry per query
/// embedding.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<HashMap<String, serde_json::Value>>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
}

impl ChromaDBStore {
    /// Connect to a ChromaDB server and resolve the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or the collection does
    /// not exist.
    pub async fn connect(url: &str, collection: &str) -> Result<Self> {
        let http = reqwest::Client::new();
        let base_url = url.trim_end_matches('/').to_string();

        let response = http
            .get(format!("{}/api/v1/collections/{}", base_url, collection))
            .send()
            .await
            .map_err(|e| AppError::VectorStore(format!("ChromaDB unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::NotFound(format!(
                "ChromaDB collection '{}' not available ({})",
                collection,
                response.status()
            )));
        }

        let model: CollectionModel = response
            .json()
            .await
            .map_err(|e| AppError::VectorStore(format!("Invalid ChromaDB response: {}", e)))?;

        info!(collection, id = %model.id, url = %base_url, "Connected to ChromaDB collection");

        Ok(Self {
            http,
            base_url,
            collection: collection.to_string(),
            collection_id: model.id,
        })
    }

    fn ensure_collection(&self, name: &str) -> Result<()> {
        if name != self.collection {
            return Err(AppError::NotFound(format!("Collection '{}' not found", name)));
        }
        Ok(())
    }
}

impl QueryResponse {
    /// Flatten the first query's columns into ranked results.
    ///
    /// Chroma returns distances (smaller is closer); they are mapped to
    /// `1 / (1 + d)` so higher scores mean more similar.
    fn into_results(self) -> Vec<SearchResult> {
        let ids = self.ids.into_iter().next().unwrap_or_default();
        let mut documents = self
            .documents
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default()
            .into_iter();
        let mut metadatas = self
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default()
            .into_iter();
        let mut distances = self
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default()
            .into_iter();

        ids.into_iter()
            .map(|id| {
                let content = documents.next().flatten().unwrap_or_default();
                let metadata = metadatas.next().flatten().unwrap_or_default();
                let distance = distances.next().unwrap_or(0.0);
                SearchResult {
                    document: Document {
                        id,
                        content,
                        metadata,
                        embedding: None,
                    },
                    score: 1.0 / (1.0 + distance.max(0.0)),
                }
            })
            .collect()
    }
}

#[async_trait]
impl VectorStore for ChromaDBStore {
    fn provider_name(&self) -> &'static str {
        "chromadb"
    }

    async fn collection_stats(&self, name: &str) -> Result<CollectionStats> {
        self.ensure_collection(name)?;

        let count: usize = self
            .http
            .get(format!(
                "{}/api/v1/collections/{}/count",
                self.base_url, self.collection_id
            ))
            .send()
            .await
            .map_err(|e| AppError::VectorStore(format!("ChromaDB count failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::VectorStore(format!("ChromaDB count failed: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::VectorStore(format!("Invalid ChromaDB response: {}", e)))?;

        Ok(CollectionStats {
            name: name.to_string(),
            document_count: count,
            dimensions: 0,
            distance_metric: "server-defined".to_string(),
        })
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        self.ensure_collection(collection)?;

        let request = QueryRequest {
            query_embeddings: vec![embedding],
            n_results: limit,
            include: ["documents", "metadatas", "distances"],
        };

        debug!(collection, limit, "Querying ChromaDB");

        let response: QueryResponse = self
            .http
            .post(format!(
                "{}/api/v1/collections/{}/query",
                self.base_url, self.collection_id
            ))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::VectorStore(format!("ChromaDB query failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::VectorStore(format!("ChromaDB query failed: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::VectorStore(format!("Invalid ChromaDB response: {}", e)))?;

        let mut results = response.into_results();
        results.truncate(limit);
        Ok(results)
    }
}
