//! Top-k retrieval: embed the question, then search the vector store.

use crate::db::VectorStore;
use crate::rag::embeddings::Embedder;
use crate::types::{Result, SearchResult};
use std::sync::Arc;
use tracing::debug;

/// Embeds questions and searches one collection.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    collection: String,
    top_k: usize,
}

impl Retriever {
    /// Search `collection` for the `top_k` closest chunks.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            collection: collection.into(),
            top_k,
        }
    }

    /// Number of chunks returned per question.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Collection being searched.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Return up to `top_k` chunks, most similar first.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        let embedding = self.embedder.embed(question).await?;

        let mut results = self
            .store
            .search(&self.collection, &embedding, self.top_k)
            .await?;

        // Backends are expected to rank already; don't trust remote ones blindly.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(self.top_k);

        debug!(
            collection = %self.collection,
            store = self.store.provider_name(),
            hits = results.len(),
            "Retrieved context"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::vectorstore::CollectionStats;
    use crate::types::{AppError, Document};
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Store {}

        #[async_trait]
        impl VectorStore for Store {
            fn provider_name(&self) -> &'static str;
            async fn collection_stats(&self, name: &str) -> Result<CollectionStats>;
            async fn search(
                &self,
                collection: &str,
                embedding: &[f32],
                limit: usize,
            ) -> Result<Vec<SearchResult>>;
        }
    }

    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(AppError::Embedding("embedding service down".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    fn hit(id: &str, score: f32) -> SearchResult {
        SearchResult {
            document: Document::new(id, format!("content of {}", id)),
            score,
        }
    }

    #[tokio::test]
    async fn test_retrieve_passes_collection_embedding_and_k() {
        let mut store = MockStore::new();
        store.expect_provider_name().return_const("mock");
        store
            .expect_search()
            .withf(|collection, embedding, limit| {
                collection.to_string() == "rag_collection" && embedding.len() == 2 && *limit == 3
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![hit("a", 0.9), hit("b", 0.5)]));

        let retriever = Retriever::new(
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            Arc::new(store),
            "rag_collection",
            3,
        );

        let results = retriever.retrieve("question").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.id, "a");
    }

    #[tokio::test]
    async fn test_retrieve_orders_and_truncates() {
        let mut store = MockStore::new();
        store.expect_provider_name().return_const("mock");
        store.expect_search().returning(|_, _, _| {
            Ok(vec![
                hit("low", 0.1),
                hit("high", 0.9),
                hit("mid", 0.5),
                hit("extra", 0.05),
            ])
        });

        let retriever = Retriever::new(
            Arc::new(FixedEmbedder(vec![1.0])),
            Arc::new(store),
            "docs",
            3,
        );

        let results = retriever.retrieve("q").await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[tokio::test]
    async fn test_embedding_failure_skips_search() {
        let mut store = MockStore::new();
        store.expect_search().never();

        let retriever = Retriever::new(Arc::new(FailingEmbedder), Arc::new(store), "docs", 3);

        let result = retriever.retrieve("q").await;
        assert!(matches!(result, Err(AppError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockStore::new();
        store
            .expect_search()
            .returning(|_, _, _| Err(AppError::VectorStore("disk gone".to_string())));

        let retriever = Retriever::new(
            Arc::new(FixedEmbedder(vec![1.0])),
            Arc::new(store),
            "docs",
            3,
        );

        let result = retriever.retrieve("q").await;
        assert!(matches!(result, Err(AppError::VectorStore(_))));
    }
}
