//! The chat orchestrator.
//!
//! [`RagChatbot`] is the single error boundary of the application: building
//! the pipeline and answering a question both swallow failures, log them, and
//! hand the caller a fixed apology instead.

use crate::db::{VectorStore, create_store};
use crate::llm::{LLMClient, Provider};
use crate::rag::embeddings::{Embedder, create_embedder};
use crate::rag::prompt::PromptTemplate;
use crate::rag::retriever::Retriever;
use crate::types::Result;
use crate::utils::config::RagbotConfig;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Returned for every question while the pipeline is disabled.
pub const UNAVAILABLE_MESSAGE: &str = "Sorry, the RAG system is not available right now.";

/// Returned when retrieval or generation fails for a question.
pub const PROCESSING_ERROR_MESSAGE: &str =
    "Sorry, I encountered an error while processing your question.";

/// Retriever, prompt template and LLM wired together.
pub struct RagPipeline {
    retriever: Retriever,
    template: PromptTemplate,
    llm: Arc<dyn LLMClient>,
}

impl RagPipeline {
    /// Wire already-built components together.
    pub fn new(retriever: Retriever, template: PromptTemplate, llm: Arc<dyn LLMClient>) -> Self {
        Self {
            retriever,
            template,
            llm,
        }
    }

    /// Build every component from configuration.
    ///
    /// Order: embedder, vector store, LLM client. The first failure wins.
    pub async fn from_config(config: &RagbotConfig) -> Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::from(create_embedder(&config.embeddings).await?);
        let store: Arc<dyn VectorStore> = Arc::from(create_store(&config.vector_store).await?);

        let provider = Provider::from_config(&config.llm)?;
        let llm: Arc<dyn LLMClient> = Arc::from(provider.create_client().await?);

        let retriever = Retriever::new(
            embedder,
            store,
            config.vector_store.collection(),
            config.rag.top_k,
        );

        Ok(Self::new(
            retriever,
            PromptTemplate::new(config.rag.system_prompt.clone()),
            llm,
        ))
    }

    /// Retrieve, assemble and generate. Errors propagate.
    pub async fn run(&self, question: &str) -> Result<String> {
        let results = self.retriever.retrieve(question).await?;
        let prompt = self.template.assemble(&results, question);

        debug!(
            model = self.llm.model_name(),
            chunks = results.len(),
            "Invoking LLM"
        );

        self.llm.generate_with_system(&prompt.system, &prompt.user).await
    }
}

/// Question-answering front door shared by the HTTP handlers and the CLI.
pub struct RagChatbot {
    pipeline: Option<RagPipeline>,
}

impl RagChatbot {
    /// Try to build the pipeline; on failure the chatbot is disabled.
    ///
    /// Never returns an error: a broken setup only shows up as
    /// [`UNAVAILABLE_MESSAGE`] answers and an error in the log.
    pub async fn initialize(config: &RagbotConfig) -> Self {
        match RagPipeline::from_config(config).await {
            Ok(pipeline) => {
                info!(
                    llm = config.llm.provider_name(),
                    model = config.llm.model(),
                    store = config.vector_store.provider_name(),
                    collection = config.vector_store.collection(),
                    top_k = config.rag.top_k,
                    "✅ RAG system initialized successfully"
                );
                Self::from_pipeline(pipeline)
            }
            Err(e) => {
                error!(error = %e, "❌ Error initializing RAG system");
                Self::disabled()
            }
        }
    }

    /// Wrap a ready pipeline.
    pub fn from_pipeline(pipeline: RagPipeline) -> Self {
        Self {
            pipeline: Some(pipeline),
        }
    }

    /// A chatbot that answers every question with the unavailable message.
    pub fn disabled() -> Self {
        Self { pipeline: None }
    }

    /// Whether initialization succeeded.
    pub fn is_available(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Answer a question, never failing.
    pub async fn answer(&self, question: &str) -> String {
        let Some(pipeline) = &self.pipeline else {
            return UNAVAILABLE_MESSAGE.to_string();
        };

        match pipeline.run(question).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "Error getting response");
                PROCESSING_ERROR_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryVectorStore;
    use crate::types::{AppError, Document};
    use crate::utils::config::{EmbeddingConfig, LlmConfig, VectorStoreConfig};
    use async_trait::async_trait;

    struct KeywordEmbedder;

    /// Two-dimensional toy embedding: [mentions France, mentions Germany].
    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let text = text.to_lowercase();
            Ok(vec![
                if text.contains("france") { 1.0 } else { 0.0 },
                if text.contains("germany") { 1.0 } else { 0.1 },
            ])
        }

        fn model_name(&self) -> &str {
            "keyword"
        }
    }

    /// Echoes the whole prompt back.
    struct EchoLLM;

    #[async_trait]
    impl LLMClient for EchoLLM {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }

        async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
            Ok(format!("{}\n---\n{}", system, prompt))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    struct FailingLLM;

    #[async_trait]
    impl LLMClient for FailingLLM {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(AppError::LLM("quota exceeded".to_string()))
        }

        async fn generate_with_system(&self, _system: &str, _prompt: &str) -> Result<String> {
            Err(AppError::LLM("quota exceeded".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    fn geography_store() -> Arc<InMemoryVectorStore> {
        let store = InMemoryVectorStore::new();
        store.create_collection("rag_collection", 2).unwrap();
        store
            .upsert(
                "rag_collection",
                &[
                    Document::new("fr", "Paris is the capital of France.")
                        .with_embedding(vec![1.0, 0.0]),
                    Document::new("de", "Berlin is the capital of Germany.")
                        .with_embedding(vec![0.0, 1.0]),
                ],
            )
            .unwrap();
        Arc::new(store)
    }

    fn chatbot_with(llm: Arc<dyn LLMClient>, top_k: usize) -> RagChatbot {
        let retriever = Retriever::new(
            Arc::new(KeywordEmbedder),
            geography_store(),
            "rag_collection",
            top_k,
        );
        RagChatbot::from_pipeline(RagPipeline::new(retriever, PromptTemplate::default(), llm))
    }

    #[tokio::test]
    async fn test_disabled_returns_unavailable() {
        let chatbot = RagChatbot::disabled();

        assert!(!chatbot.is_available());
        assert_eq!(chatbot.answer("hi").await, UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_answer_contains_retrieved_context() {
        let chatbot = chatbot_with(Arc::new(EchoLLM), 1);

        let answer = chatbot.answer("What is the capital of France?").await;
        assert!(answer.contains("Paris"));
        assert!(!answer.contains("Berlin"));
        assert!(answer.contains("What is the capital of France?"));
    }

    #[tokio::test]
    async fn test_llm_failure_returns_processing_error() {
        let chatbot = chatbot_with(Arc::new(FailingLLM), 3);

        assert!(chatbot.is_available());
        assert_eq!(
            chatbot.answer("What is the capital of France?").await,
            PROCESSING_ERROR_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_answer_is_deterministic() {
        let chatbot = chatbot_with(Arc::new(EchoLLM), 3);

        let first = chatbot.answer("Tell me about Germany").await;
        let second = chatbot.answer("Tell me about Germany").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_initialize_with_missing_store_is_disabled() {
        let config = RagbotConfig {
            vector_store: VectorStoreConfig::Local {
                path: "/nonexistent/ragbot/chroma_db".to_string(),
                collection: "rag_collection".to_string(),
            },
            ..Default::default()
        };

        let chatbot = RagChatbot::initialize(&config).await;
        assert!(!chatbot.is_available());
        assert_eq!(chatbot.answer("hi").await, UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_initialize_with_missing_credentials_is_disabled() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("rag_collection.json"), "[]").unwrap();

        let config = RagbotConfig {
            vector_store: VectorStoreConfig::Local {
                path: dir.path().to_string_lossy().to_string(),
                collection: "rag_collection".to_string(),
            },
            embeddings: EmbeddingConfig::Ollama {
                base_url: "http://127.0.0.1:9".to_string(),
                model: "all-minilm".to_string(),
            },
            llm: LlmConfig::Gemini {
                model: "gemini-1.5-flash".to_string(),
                temperature: 0.2,
                api_key_env: "RAGBOT_TEST_CHATBOT_UNSET_KEY".to_string(),
                api_base: "http://127.0.0.1:9".to_string(),
            },
            ..Default::default()
        };

        let chatbot = RagChatbot::initialize(&config).await;
        assert!(!chatbot.is_available());
        assert_eq!(chatbot.answer("hi").await, UNAVAILABLE_MESSAGE);
    }
}
