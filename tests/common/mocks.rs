//! Mock implementations for testing.
//!
//! Mock LLM clients, embedders and helpers that build a ready
//! [`RagChatbot`] without touching the network.

use async_trait::async_trait;
use ragbot::db::InMemoryVectorStore;
use ragbot::rag::chatbot::{RagChatbot, RagPipeline};
use ragbot::rag::prompt::PromptTemplate;
use ragbot::rag::retriever::Retriever;
use ragbot::types::{AppError, Document, Result};
use ragbot::{Embedder, LLMClient};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone)]
enum Behavior {
    /// Return the system instruction and the question, separated by a rule.
    Echo,
    Fixed(String),
    Fail,
}

/// Mock LLM client for testing with configurable responses.
///
/// ```ignore
/// let client = MockLLMClient::echo();          // echoes its prompt
/// let client = MockLLMClient::new("Hello!");   // fixed answer
/// let client = MockLLMClient::failing();       // always errors
/// ```
#[derive(Clone)]
pub struct MockLLMClient {
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl MockLLMClient {
    pub fn new(response: &str) -> Self {
        Self {
            behavior: Behavior::Fixed(response.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn echo() -> Self {
        Self {
            behavior: Behavior::Echo,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of generate calls so far, shared across clones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Echo => Ok(format!("{}\n---\n{}", system, prompt)),
            Behavior::Fixed(response) => Ok(response.clone()),
            Behavior::Fail => Err(AppError::LLM("Mock LLM failure".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Embeds by keyword: one dimension per topic, so retrieval is predictable.
pub struct KeywordEmbedder;

pub const TOPICS: [&str; 3] = ["france", "germany", "spain"];

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let text = text.to_lowercase();
        Ok(TOPICS
            .iter()
            .map(|topic| if text.contains(topic) { 1.0 } else { 0.0 })
            .collect())
    }

    fn model_name(&self) -> &str {
        "keyword"
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(AppError::Embedding("Mock embedding failure".to_string()))
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Three capital-city chunks, one per topic.
pub fn capitals_store() -> Arc<InMemoryVectorStore> {
    let store = InMemoryVectorStore::new();
    store.create_collection("rag_collection", 3).unwrap();
    store
        .upsert(
            "rag_collection",
            &[
                Document::new("fr", "Paris is the capital of France.")
                    .with_embedding(vec![1.0, 0.0, 0.0]),
                Document::new("de", "Berlin is the capital of Germany.")
                    .with_embedding(vec![0.0, 1.0, 0.0]),
                Document::new("es", "Madrid is the capital of Spain.")
                    .with_embedding(vec![0.0, 0.0, 1.0]),
            ],
        )
        .unwrap();
    Arc::new(store)
}

pub fn chatbot_with_embedder(
    embedder: Arc<dyn Embedder>,
    llm: MockLLMClient,
    top_k: usize,
) -> RagChatbot {
    let retriever = Retriever::new(embedder, capitals_store(), "rag_collection", top_k);
    RagChatbot::from_pipeline(RagPipeline::new(
        retriever,
        PromptTemplate::default(),
        Arc::new(llm),
    ))
}

/// A working chatbot over [`capitals_store`].
pub fn mock_chatbot(llm: MockLLMClient, top_k: usize) -> RagChatbot {
    chatbot_with_embedder(Arc::new(KeywordEmbedder), llm, top_k)
}
