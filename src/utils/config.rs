//! TOML-based configuration for ragbot
//!
//! Everything is optional: a missing `ragbot.toml` yields the built-in
//! defaults (Gemini, `./Notebook/chroma_db`, top-3 retrieval, port 5000).
//!
//! Secrets are never stored in the file. Provider sections name the
//! environment variable that holds the key (`api_key_env`) and the value is
//! resolved when the client is built.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Root configuration structure loaded from ragbot.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagbotConfig {
    /// `[server]` section
    #[serde(default)]
    pub server: ServerConfig,

    /// `[vector_store]` section
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// `[embeddings]` section
    #[serde(default)]
    pub embeddings: EmbeddingConfig,

    /// `[llm]` section
    #[serde(default)]
    pub llm: LlmConfig,

    /// `[rag]` section
    #[serde(default)]
    pub rag: RagConfig,
}

// ============= Server Configuration =============

/// HTTP listener and logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

/// A section without a `provider` key falls back to the default provider.
fn with_default_provider<'de, D: Deserializer<'de>>(
    deserializer: D,
    provider: &str,
) -> Result<toml::Value, D::Error> {
    let mut table = toml::Table::deserialize(deserializer)?;
    table
        .entry("provider")
        .or_insert_with(|| toml::Value::String(provider.to_string()));
    Ok(toml::Value::Table(table))
}

macro_rules! provider_tagged {
    ($ty:ty, $default:literal) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let section = with_default_provider(deserializer, $default)?;
                <$ty>::deserialize(section).map_err(de::Error::custom)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                <$ty>::serialize(self, serializer)
            }
        }
    };
}

// ============= Vector Store Configuration =============

/// Which vector store to read from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "provider", rename_all = "lowercase")]
pub enum VectorStoreConfig {
    /// Persisted directory with one `<collection>.json` file per collection
    Local {
        /// Persist directory
        #[serde(default = "default_store_path")]
        path: String,
        /// Collection to search
        #[serde(default = "default_collection")]
        collection: String,
    },
    /// Running ChromaDB server (requires the `chromadb` feature)
    ChromaDB {
        /// Server URL
        #[serde(default = "default_chroma_url")]
        url: String,
        /// Collection to search
        #[serde(default = "default_collection")]
        collection: String,
    },
}

fn default_store_path() -> String {
    "./Notebook/chroma_db".to_string()
}

fn default_collection() -> String {
    "rag_collection".to_string()
}

fn default_chroma_url() -> String {
    "http://localhost:8000".to_string()
}

provider_tagged!(VectorStoreConfig, "local");

impl Default for VectorStoreConfig {
    fn default() -> Self {
        VectorStoreConfig::Local {
            path: default_store_path(),
            collection: default_collection(),
        }
    }
}

impl VectorStoreConfig {
    /// Value of the `provider` key
    pub fn provider_name(&self) -> &'static str {
        match self {
            VectorStoreConfig::Local { .. } => "local",
            VectorStoreConfig::ChromaDB { .. } => "chromadb",
        }
    }

    /// Collection to search
    pub fn collection(&self) -> &str {
        match self {
            VectorStoreConfig::Local { collection, .. } => collection,
            VectorStoreConfig::ChromaDB { collection, .. } => collection,
        }
    }

    /// Whether support for this backend was compiled into the binary
    pub fn is_compiled(&self) -> bool {
        match self {
            VectorStoreConfig::Local { .. } => true,
            VectorStoreConfig::ChromaDB { .. } => cfg!(feature = "chromadb"),
        }
    }
}

// ============= Embedding Configuration =============

/// How questions are embedded. Must match the model used at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "provider", rename_all = "lowercase")]
pub enum EmbeddingConfig {
    /// Ollama `/api/embed`
    Ollama {
        /// Server URL
        #[serde(default = "default_ollama_url")]
        base_url: String,
        /// Embedding model
        #[serde(default = "default_ollama_embedding_model")]
        model: String,
    },
    /// In-process ONNX model (requires the `local-embeddings` feature)
    FastEmbed {
        /// Model name
        #[serde(default = "default_fastembed_model")]
        model: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_embedding_model() -> String {
    // all-MiniLM-L6-v2 as published in the Ollama library
    "all-minilm".to_string()
}

fn default_fastembed_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

provider_tagged!(EmbeddingConfig, "ollama");

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig::Ollama {
            base_url: default_ollama_url(),
            model: default_ollama_embedding_model(),
        }
    }
}

impl EmbeddingConfig {
    /// Value of the `provider` key
    pub fn provider_name(&self) -> &'static str {
        match self {
            EmbeddingConfig::Ollama { .. } => "ollama",
            EmbeddingConfig::FastEmbed { .. } => "fastembed",
        }
    }

    /// Embedding model name
    pub fn model(&self) -> &str {
        match self {
            EmbeddingConfig::Ollama { model, .. } => model,
            EmbeddingConfig::FastEmbed { model } => model,
        }
    }

    /// Whether support for this provider was compiled into the binary
    pub fn is_compiled(&self) -> bool {
        match self {
            EmbeddingConfig::Ollama { .. } => true,
            EmbeddingConfig::FastEmbed { .. } => cfg!(feature = "local-embeddings"),
        }
    }
}

// ============= LLM Configuration =============

/// The answering model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "provider", rename_all = "lowercase")]
pub enum LlmConfig {
    /// Google Gemini
    Gemini {
        /// Model name
        #[serde(default = "default_gemini_model")]
        model: String,
        /// Sampling temperature, 0.0..=2.0
        #[serde(default = "default_temperature")]
        temperature: f32,
        /// Environment variable containing the API key
        #[serde(default = "default_gemini_key_env")]
        api_key_env: String,
        /// REST base URL
        #[serde(default = "default_gemini_base")]
        api_base: String,
    },
    /// Ollama server (requires the `ollama` feature)
    Ollama {
        /// Server URL
        #[serde(default = "default_ollama_url")]
        base_url: String,
        /// Model name, required
        model: String,
    },
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_gemini_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_gemini_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

provider_tagged!(LlmConfig, "gemini");

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig::Gemini {
            model: default_gemini_model(),
            temperature: default_temperature(),
            api_key_env: default_gemini_key_env(),
            api_base: default_gemini_base(),
        }
    }
}

impl LlmConfig {
    /// Value of the `provider` key
    pub fn provider_name(&self) -> &'static str {
        match self {
            LlmConfig::Gemini { .. } => "gemini",
            LlmConfig::Ollama { .. } => "ollama",
        }
    }

    /// Model name
    pub fn model(&self) -> &str {
        match self {
            LlmConfig::Gemini { model, .. } => model,
            LlmConfig::Ollama { model, .. } => model,
        }
    }

    /// Name of the environment variable holding the credentials, if any
    pub fn api_key_env(&self) -> Option<&str> {
        match self {
            LlmConfig::Gemini { api_key_env, .. } => Some(api_key_env),
            LlmConfig::Ollama { .. } => None,
        }
    }

    /// Whether support for this provider was compiled into the binary
    pub fn is_compiled(&self) -> bool {
        match self {
            LlmConfig::Gemini { .. } => true,
            LlmConfig::Ollama { .. } => cfg!(feature = "ollama"),
        }
    }
}

// ============= RAG Configuration =============

/// Default system instruction with its `{context}` slot
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant for question-answering tasks.
Use the following pieces of retrieved context to answer the question.
If you don't know the answer, just say that you don't know.
Keep the answer concise and helpful.

Context: {context}";

/// Retrieval and prompt settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Number of chunks retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// System instruction; `{context}` is replaced by the retrieved chunks
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_top_k() -> usize {
    3
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            system_prompt: default_system_prompt(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file does not exist
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read configuration file")]
    ReadError(#[from] std::io::Error),

    /// Invalid TOML or schema mismatch
    #[error("Failed to parse TOML")]
    ParseError(#[from] toml::de::Error),

    /// Serialization failed
    #[error("Failed to render TOML")]
    RenderError(#[from] toml::ser::Error),

    /// Parsed but out of range
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A referenced secret is unset
    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl RagbotConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound(path)) => {
                info!(path = %path.display(), "No config file found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RagbotConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check ranges and required non-empty values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if self.rag.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "rag.top_k must be at least 1".to_string(),
            ));
        }

        if self.vector_store.collection().trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "vector_store.collection must not be empty".to_string(),
            ));
        }

        if self.embeddings.model().trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "embeddings.model must not be empty".to_string(),
            ));
        }

        if self.llm.model().trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".to_string(),
            ));
        }

        if let LlmConfig::Gemini { temperature, .. } = &self.llm {
            if !(0.0..=2.0).contains(temperature) {
                return Err(ConfigError::ValidationError(format!(
                    "llm.temperature must be within 0.0..=2.0, got {}",
                    temperature
                )));
            }
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(env_name: &str) -> Result<String, ConfigError> {
        std::env::var(env_name).map_err(|_| ConfigError::MissingEnvVar(env_name.to_string()))
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
