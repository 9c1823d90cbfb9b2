//! Vector Store Abstraction Layer
//!
//! This module provides a unified, read-oriented interface over the vector
//! databases the chatbot retrieves from. The store is populated out-of-band
//! by an ingestion job; ragbot only ever searches it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               VectorStore Trait              │
//! ├──────────────────────────────────────────────┤
//! │  provider_name  │  collection_stats │ search │
//! └──────────────────────────────────────────────┘
//!          ▲                 ▲               ▲
//!          │                 │               │
//!    ┌─────┴────┐     ┌──────┴─────┐   ┌─────┴────┐
//!    │  Local   │     │  InMemory  │   │ ChromaDB │
//!    │(default) │     │  (tests)   │   │ (server) │
//!    └──────────┘     └────────────┘   └──────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use ragbot::db::vectorstore::create_store;
//!
//! let store = create_store(&config.vector_store).await?;
//! let results = store.search("rag_collection", &query_embedding, 3).await?;
//! ```

use crate::types::{AppError, Document, Result, SearchResult};
use crate::utils::config::VectorStoreConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Store Construction
// ============================================================================

/// Open the vector store described by the configuration.
///
/// # Errors
///
/// Returns an error if the store cannot be opened (missing directory,
/// unreadable collection, unreachable server) or the backend was not
/// compiled into this binary.
pub async fn create_store(config: &VectorStoreConfig) -> Result<Box<dyn VectorStore>> {
    match config {
        VectorStoreConfig::Local { path, collection } => {
            let store = super::local::LocalVectorStore::open(path, collection).await?;
            Ok(Box::new(store))
        }

        #[cfg(feature = "chromadb")]
        VectorStoreConfig::ChromaDB { url, collection } => {
            let store = super::chromadb::ChromaDBStore::connect(url, collection).await?;
            Ok(Box::new(store))
        }

        #[cfg(not(feature = "chromadb"))]
        VectorStoreConfig::ChromaDB { .. } => Err(AppError::Configuration(
            "ChromaDB vector store requested but ragbot was built without the 'chromadb' feature"
                .into(),
        )),
    }
}

// ============================================================================
// Collection Statistics
// ============================================================================

/// Statistics about a vector collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Name of the collection.
    pub name: String,
    /// Number of documents/vectors in the collection.
    pub document_count: usize,
    /// Dimensionality of vectors in the collection (0 if unknown or empty).
    pub dimensions: usize,
    /// Distance metric used (e.g., "cosine").
    pub distance_metric: String,
}

// ============================================================================
// Vector Store Trait
// ============================================================================

/// Abstract trait for vector database lookups.
///
/// # Implementors
///
/// - `LocalVectorStore` - Persisted JSON collections (default)
/// - `ChromaDBStore` - ChromaDB server over REST
/// - `InMemoryVectorStore` - Testing and embedding
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Get the name of this vector store provider.
    fn provider_name(&self) -> &'static str;

    /// Get statistics about a collection.
    async fn collection_stats(&self, name: &str) -> Result<CollectionStats>;

    /// Search for similar vectors in a collection.
    ///
    /// # Arguments
    ///
    /// * `collection` - Name of the collection to search.
    /// * `embedding` - Query vector to find similar documents.
    /// * `limit` - Maximum number of results to return.
    ///
    /// # Returns
    ///
    /// A vector of search results, sorted by similarity score (descending).
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Count documents in a collection.
    async fn count(&self, collection: &str) -> Result<usize> {
        let stats = self.collection_stats(collection).await?;
        Ok(stats.document_count)
    }
}

// ============================================================================
// Similarity Ranking
// ============================================================================

/// Calculate cosine similarity between two vectors of equal length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Exhaustive top-`limit` ranking by cosine similarity.
///
/// `dimensions` is the collection's vector size; a query of a different size
/// is rejected rather than scored.
pub(crate) fn rank_documents<'a, I>(
    documents: I,
    dimensions: usize,
    embedding: &[f32],
    limit: usize,
) -> Result<Vec<SearchResult>>
where
    I: IntoIterator<Item = &'a Document>,
{
    if dimensions != 0 && embedding.len() != dimensions {
        return Err(AppError::InvalidInput(format!(
            "Query embedding has {} dimensions, collection expects {}",
            embedding.len(),
            dimensions
        )));
    }

    let mut results: Vec<SearchResult> = documents
        .into_iter()
        .filter_map(|doc| {
            let doc_embedding = doc.embedding.as_ref()?;
            let score = cosine_similarity(embedding, doc_embedding);
            Some(SearchResult {
                document: Document {
                    id: doc.id.clone(),
                    content: doc.content.clone(),
                    metadata: doc.metadata.clone(),
                    embedding: None, // Don't return embeddings in results
                },
                score,
            })
        })
        .collect();

    // Sort by score descending, ties broken by id for stable output
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.document.id.cmp(&b.document.id))
    });

    results.truncate(limit);

    Ok(results)
}

// ============================================================================
// In-Memory Vector Store
// ============================================================================

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory vector store.
///
/// Data is not persisted and will be lost when the process exits.
/// Uses cosine similarity for vector comparisons.
pub struct InMemoryVectorStore {
    collections: Arc<RwLock<HashMap<String, InMemoryCollection>>>,
}

struct InMemoryCollection {
    dimensions: usize,
    documents: HashMap<String, Document>,
}

impl InMemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new collection with the specified vector dimensions.
    pub fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write();
        if collections.contains_key(name) {
            return Err(AppError::InvalidInput(format!(
                "Collection '{}' already exists",
                name
            )));
        }
        collections.insert(
            name.to_string(),
            InMemoryCollection {
                dimensions,
                documents: HashMap::new(),
            },
        );
        Ok(())
    }

    /// Insert or replace documents; every document needs an embedding of the
    /// collection's dimensionality.
    pub fn upsert(&self, collection: &str, documents: &[Document]) -> Result<usize> {
        let mut collections = self.collections.write();
        let col = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", collection)))?;

        let mut count = 0;
        for doc in documents {
            let embedding = doc.embedding.as_ref().ok_or_else(|| {
                AppError::InvalidInput(format!("Document '{}' is missing embedding", doc.id))
            })?;
            if embedding.len() != col.dimensions {
                return Err(AppError::InvalidInput(format!(
                    "Document '{}' has {} dimensions, collection expects {}",
                    doc.id,
                    embedding.len(),
                    col.dimensions
                )));
            }
            col.documents.insert(doc.id.clone(), doc.clone());
            count += 1;
        }

        Ok(count)
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn provider_name(&self) -> &'static str {
        "in-memory"
    }

    async fn collection_stats(&self, name: &str) -> Result<CollectionStats> {
        let collections = self.collections.read();
        let col = collections
            .get(name)
            .ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", name)))?;

        Ok(CollectionStats {
            name: name.to_string(),
            document_count: col.documents.len(),
            dimensions: col.dimensions,
            distance_metric: "cosine".to_string(),
        })
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read();
        let col = collections
            .get(collection)
            .ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", collection)))?;

        rank_documents(col.documents.values(), col.dimensions, embedding, limit)
    }
}

// ============================================================================
// Tests
// ============================================================================
