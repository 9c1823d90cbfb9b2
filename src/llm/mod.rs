//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for the hosted generative models
//! the chatbot forwards prompts to. Provider-specific code sits behind the
//! [`LLMClient`] trait so the orchestrator never depends on a concrete API.
//!
//! # Supported Providers
//!
//! - `gemini` - Google Gemini `generateContent` (always available)
//! - `ollama` - Ollama server (Cargo feature `ollama`, on by default)
//!
//! # Example
//!
//! ```ignore
//! use ragbot::llm::{LLMClient, Provider};
//!
//! let provider = Provider::from_config(&config.llm)?;
//! let client = provider.create_client().await?;
//!
//! let answer = client.generate_with_system("Be concise.", "What is 2+2?").await?;
//! println!("{}", answer);
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Google Gemini REST client.
pub mod gemini;

/// Ollama client (`ollama` feature).
#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::{LLMClient, Provider};
