//! # ragbot - Retrieval-Augmented Chatbot Server
//!
//! A small web chatbot that answers questions from a pre-built vector store:
//! the question is embedded, the most similar chunks are retrieved, and a
//! hosted LLM answers with those chunks stuffed into its system prompt.
//!
//! ## Overview
//!
//! ragbot can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `ragbot` binary
//! 2. **As a library** - Build a [`RagChatbot`] and mount [`api::routes::create_router`]
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use ragbot::{AppState, RagChatbot, RagbotConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RagbotConfig::load_or_default("ragbot.toml")?;
//!     let chatbot = RagChatbot::initialize(&config).await;
//!
//!     let state = AppState {
//!         config: Arc::new(config),
//!         chatbot: Arc::new(chatbot),
//!     };
//!     let app = ragbot::api::routes::create_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama as the answering LLM (default) |
//! | `local-embeddings` | In-process fastembed query embeddings |
//! | `chromadb` | ChromaDB server as the vector store |
//!
//! Gemini, Ollama embeddings and the local JSON vector store are always
//! available.
//!
//! ## Modules
//!
//! - [`api`] - HTTP routes and handlers
//! - [`cli`] - Launcher arguments, pre-flight checks, terminal output
//! - [`db`] - Vector stores
//! - [`llm`] - LLM client implementations
//! - [`rag`] - Retrieval, prompt assembly and the chatbot orchestrator
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration (`ragbot.toml`)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line launcher support.
pub mod cli;
/// Vector store backends.
pub mod db;
/// LLM provider clients and abstractions.
pub mod llm;
/// Retrieval Augmented Generation (RAG) components.
pub mod rag;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use db::VectorStore;
pub use llm::{LLMClient, Provider};
pub use rag::chatbot::RagChatbot;
pub use rag::embeddings::Embedder;
pub use types::{AppError, Result};
pub use utils::config::RagbotConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration
    pub config: Arc<RagbotConfig>,
    /// The question-answering pipeline, built once at startup
    pub chatbot: Arc<RagChatbot>,
}
