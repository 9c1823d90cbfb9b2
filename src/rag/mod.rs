//! Retrieval Augmented Generation (RAG) Pipeline
//!
//! This module answers questions grounded in a pre-populated document
//! collection.
//!
//! # Module Structure
//!
//! - [`rag::embeddings`](crate::rag::embeddings) - Query embedding (Ollama, fastembed)
//! - [`rag::retriever`](crate::rag::retriever) - Top-k similarity retrieval
//! - [`rag::prompt`](crate::rag::prompt) - Context stuffing into the system instruction
//! - [`rag::chatbot`](crate::rag::chatbot) - Orchestration and the user-facing error boundary
//!
//! # RAG Pipeline
//!
//! 1. **Retrieval** - Question embedded, the `top_k` most similar chunks fetched
//! 2. **Assembly** - Chunks joined into the `{context}` slot of the system prompt
//! 3. **Generation** - LLM answers the question given that instruction
//!
//! Ingestion (chunking, embedding and storing documents) happens elsewhere.
//!
//! # Example
//!
//! ```ignore
//! use ragbot::rag::chatbot::RagChatbot;
//!
//! let chatbot = RagChatbot::initialize(&config).await;
//! let answer = chatbot.answer("What is the capital of France?").await;
//! ```

/// Orchestrator and its error boundary.
pub mod chatbot;
/// Query embedding providers.
pub mod embeddings;
/// Context stuffing.
pub mod prompt;
/// Top-k retrieval.
pub mod retriever;
