//! Vector stores.
//!
//! The chatbot only reads from its vector store; documents are written by an
//! external ingestion process. The following backends are supported:
//! - `local` (default) - a persist directory with one JSON file per collection
//! - `chromadb` - a running ChromaDB server (Cargo feature `chromadb`)
//! - in-memory - used by tests and by library callers that bring their own data
//!
//! ```toml
//! ragbot-server = { version = "*", features = ["chromadb"] }
//! ```

#![allow(missing_docs)]

// Vector store abstraction layer
/// Store trait, factory and in-memory backend.
pub mod vectorstore;

// Provider implementations
/// ChromaDB REST backend.
#[cfg(feature = "chromadb")]
pub mod chromadb;
/// Default JSON-file backend.
pub mod local;

// Re-exports
pub use local::LocalVectorStore;
pub use vectorstore::{CollectionStats, InMemoryVectorStore, VectorStore, create_store};

#[cfg(feature = "chromadb")]
pub use chromadb::ChromaDBStore;
