//! Persisted local vector store.
//!
//! Reads one collection from `{path}/{collection}.json`, a JSON array of
//! [`Document`]s with embeddings, produced by the offline ingestion job. The
//! file is read once when the store is opened and never written back.

use crate::types::{AppError, Document, Result, SearchResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::vectorstore::{CollectionStats, VectorStore, rank_documents};

/// Read-only vector store backed by a directory of JSON collections.
pub struct LocalVectorStore {
    path: PathBuf,
    collection: String,
    dimensions: usize,
    documents: Arc<RwLock<Vec<Document>>>,
}

impl LocalVectorStore {
    /// Open a collection from a persist directory.
    ///
    /// # Errors
    ///
    /// - [`AppError::Configuration`] if the directory does not exist
    /// - [`AppError::NotFound`] if the collection file is absent
    /// - [`AppError::VectorStore`] if the file is unreadable, malformed, or
    ///   holds documents without embeddings or with mixed dimensions
    pub async fn open(path: impl AsRef<Path>, collection: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(AppError::Configuration(format!(
                "Vector store directory not found: {}",
                path.display()
            )));
        }

        let file = Self::collection_file(&path, collection);
        if !tokio::fs::try_exists(&file).await.unwrap_or(false) {
            return Err(AppError::NotFound(format!(
                "Collection '{}' not found in {}",
                collection,
                path.display()
            )));
        }

        let data = tokio::fs::read_to_string(&file).await.map_err(|e| {
            AppError::VectorStore(format!("Failed to read {}: {}", file.display(), e))
        })?;

        let documents: Vec<Document> = serde_json::from_str(&data).map_err(|e| {
            AppError::VectorStore(format!("Failed to parse {}: {}", file.display(), e))
        })?;

        let dimensions = Self::check_dimensions(&documents)?;

        info!(
            collection,
            documents = documents.len(),
            dimensions,
            path = %path.display(),
            "Loaded vector collection"
        );

        Ok(Self {
            path,
            collection: collection.to_string(),
            dimensions,
            documents: Arc::new(RwLock::new(documents)),
        })
    }

    /// Location of a collection file inside a persist directory.
    pub fn collection_file(path: &Path, collection: &str) -> PathBuf {
        path.join(format!("{}.json", collection))
    }

    /// Directory this store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_dimensions(documents: &[Document]) -> Result<usize> {
        let mut dimensions = None;

        for doc in documents {
            let embedding = doc.embedding.as_ref().ok_or_else(|| {
                AppError::VectorStore(format!("Document '{}' is missing embedding", doc.id))
            })?;

            match dimensions {
                None => dimensions = Some(embedding.len()),
                Some(expected) if expected != embedding.len() => {
                    return Err(AppError::VectorStore(format!(
                        "Document '{}' has {} dimensions, expected {}",
                        doc.id,
                        embedding.len(),
                        expected
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(dimensions.unwrap_or(0))
    }

    fn ensure_collection(&self, name: &str) -> Result<()> {
        if name != self.collection {
            return Err(AppError::NotFound(format!("Collection '{}' not found", name)));
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    fn provider_name(&self) -> &'static str {
        "local"
    }

    async fn collection_stats(&self, name: &str) -> Result<CollectionStats> {
        self.ensure_collection(name)?;

        Ok(CollectionStats {
            name: name.to_string(),
            document_count: self.documents.read().len(),
            dimensions: self.dimensions,
            distance_metric: "cosine".to_string(),
        })
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        self.ensure_collection(collection)?;

        let documents = self.documents.read();
        rank_documents(documents.iter(), self.dimensions, embedding, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_collection(dir: &TempDir, name: &str, value: serde_json::Value) {
        let file = LocalVectorStore::collection_file(dir.path(), name);
        std::fs::write(file, serde_json::to_string(&value).unwrap()).unwrap();
    }

    fn geography() -> serde_json::Value {
        json!([
            {"id": "fr", "content": "Paris is the capital of France.", "metadata": {"source": "geo.txt"}, "embedding": [1.0, 0.0, 0.0]},
            {"id": "de", "content": "Berlin is the capital of Germany.", "embedding": [0.8, 0.6, 0.0]},
            {"id": "es", "content": "Madrid is the capital of Spain.", "embedding": [0.0, 1.0, 0.0]},
            {"id": "it", "content": "Rome is the capital of Italy.", "embedding": [0.0, 0.0, 1.0]}
        ])
    }

    #[tokio::test]
    async fn test_open_and_search() {
        let dir = TempDir::new().unwrap();
        write_collection(&dir, "rag_collection", geography());

        let store = LocalVectorStore::open(dir.path(), "rag_collection").await.unwrap();
        assert_eq!(store.count("rag_collection").await.unwrap(), 4);

        let results = store
            .search("rag_collection", &[1.0, 0.1, 0.0], 3)
            .await
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(ids, vec!["fr", "de", "es"]);
        assert!(results[0].score >= results[1].score);
        assert_eq!(results[0].document.metadata["source"], "geo.txt");
    }

    #[tokio::test]
    async fn test_stats() {
        let dir = TempDir::new().unwrap();
        write_collection(&dir, "rag_collection", geography());

        let store = LocalVectorStore::open(dir.path(), "rag_collection").await.unwrap();
        let stats = store.collection_stats("rag_collection").await.unwrap();

        assert_eq!(stats.dimensions, 3);
        assert_eq!(stats.distance_metric, "cosine");
        assert_eq!(store.provider_name(), "local");
        assert_eq!(store.path(), dir.path());
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let result = LocalVectorStore::open("/nonexistent/chroma_db", "rag_collection").await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_missing_collection_file() {
        let dir = TempDir::new().unwrap();

        let result = LocalVectorStore::open(dir.path(), "rag_collection").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            LocalVectorStore::collection_file(dir.path(), "rag_collection"),
            "{not json",
        )
        .unwrap();

        let result = LocalVectorStore::open(dir.path(), "rag_collection").await;
        assert!(matches!(result, Err(AppError::VectorStore(_))));
    }

    #[tokio::test]
    async fn test_mixed_dimensions_rejected() {
        let dir = TempDir::new().unwrap();
        write_collection(
            &dir,
            "rag_collection",
            json!([
                {"id": "a", "content": "A", "embedding": [1.0, 0.0]},
                {"id": "b", "content": "B", "embedding": [1.0, 0.0, 0.0]}
            ]),
        );

        let result = LocalVectorStore::open(dir.path(), "rag_collection").await;
        assert!(matches!(result, Err(AppError::VectorStore(_))));
    }

    #[tokio::test]
    async fn test_missing_embedding_rejected() {
        let dir = TempDir::new().unwrap();
        write_collection(
            &dir,
            "rag_collection",
            json!([{"id": "a", "content": "A"}]),
        );

        let result = LocalVectorStore::open(dir.path(), "rag_collection").await;
        assert!(matches!(result, Err(AppError::VectorStore(_))));
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch() {
        let dir = TempDir::new().unwrap();
        write_collection(&dir, "rag_collection", geography());

        let store = LocalVectorStore::open(dir.path(), "rag_collection").await.unwrap();
        let result = store.search("rag_collection", &[1.0, 0.0], 3).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_other_collection_not_found() {
        let dir = TempDir::new().unwrap();
        write_collection(&dir, "rag_collection", geography());

        let store = LocalVectorStore::open(dir.path(), "rag_collection").await.unwrap();
        let result = store.search("other", &[1.0, 0.0, 0.0], 3).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_collection_searches_to_nothing() {
        let dir = TempDir::new().unwrap();
        write_collection(&dir, "rag_collection", json!([]));

        let store = LocalVectorStore::open(dir.path(), "rag_collection").await.unwrap();
        let results = store.search("rag_collection", &[1.0, 0.0], 3).await.unwrap();
        assert!(results.is_empty());
    }
}
