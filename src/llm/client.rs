//! LLM Client abstractions and provider selection
//!
//! This module provides a unified interface over the hosted models ragbot can
//! talk to:
//! - **Gemini**: Google Generative Language API (default, always compiled)
//! - **Ollama**: Local or self-hosted models (`ollama` feature)

use crate::types::{AppError, Result};
use crate::utils::config::{LlmConfig, RagbotConfig};
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
///
/// Unlike [`LlmConfig`], credentials here are already resolved from the
/// environment.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Google Gemini `generateContent` API
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Gemini {
    ///     api_key: "AIza...".to_string(),
    ///     api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
    ///     model: "gemini-1.5-flash".to_string(),
    ///     temperature: 0.2,
    /// };
    /// ```
    Gemini {
        api_key: String,
        api_base: String,
        model: String,
        temperature: f32,
    },

    /// Ollama LLM provider
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.2".to_string(),
    /// };
    /// ```
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Resolve a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] when the API key variable named in
    /// the configuration is unset or empty.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        match config {
            LlmConfig::Gemini {
                model,
                temperature,
                api_key_env,
                api_base,
            } => {
                let api_key = RagbotConfig::resolve_env(api_key_env)
                    .map_err(|e| AppError::Configuration(e.to_string()))?;
                if api_key.trim().is_empty() {
                    return Err(AppError::Configuration(format!(
                        "Environment variable '{}' is empty",
                        api_key_env
                    )));
                }

                Ok(Provider::Gemini {
                    api_key,
                    api_base: api_base.clone(),
                    model: model.clone(),
                    temperature: *temperature,
                })
            }
            LlmConfig::Ollama { base_url, model } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
            }),
        }
    }

    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider was not compiled into this binary or
    /// the client cannot be constructed.
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            Provider::Gemini {
                api_key,
                api_base,
                model,
                temperature,
            } => Ok(Box::new(super::gemini::GeminiClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                *temperature,
            )?)),

            #[cfg(feature = "ollama")]
            Provider::Ollama { base_url, model } => Ok(Box::new(
                super::ollama::OllamaClient::new(base_url.clone(), model.clone()).await?,
            )),

            #[cfg(not(feature = "ollama"))]
            Provider::Ollama { model, .. } => Err(AppError::Configuration(format!(
                "Ollama provider requested (model '{}') but ragbot was built without the 'ollama' feature",
                model
            ))),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini { .. } => "Gemini",
            Provider::Ollama { .. } => "Ollama",
        }
    }
}
