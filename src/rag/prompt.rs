//! Prompt assembly.
//!
//! Retrieved chunks are "stuffed" into the system instruction in retrieval
//! order; the question becomes the human turn untouched.

use crate::types::SearchResult;
use crate::utils::config::DEFAULT_SYSTEM_PROMPT;

const CONTEXT_PLACEHOLDER: &str = "{context}";
const CHUNK_SEPARATOR: &str = "\n\n";

/// A system prompt plus a user prompt, ready for [`LLMClient::generate_with_system`].
///
/// [`LLMClient::generate_with_system`]: crate::llm::LLMClient::generate_with_system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    /// Template with the context filled in.
    pub system: String,
    /// The question, unchanged.
    pub user: String,
}

/// System-instruction template with a `{context}` slot.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl PromptTemplate {
    /// Use `system` as the template.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
        }
    }

    /// Join chunk contents with a blank line between them.
    pub fn format_context(results: &[SearchResult]) -> String {
        results
            .iter()
            .map(|r| r.document.content.as_str())
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR)
    }

    /// Fill the template with `results` and pair it with `question`.
    ///
    /// A template without a `{context}` slot gets the context appended after
    /// a blank line.
    pub fn assemble(&self, results: &[SearchResult], question: &str) -> AssembledPrompt {
        let context = Self::format_context(results);

        let system = if self.system.contains(CONTEXT_PLACEHOLDER) {
            self.system.replace(CONTEXT_PLACEHOLDER, &context)
        } else {
            format!("{}{}{}", self.system, CHUNK_SEPARATOR, context)
        };

        AssembledPrompt {
            system,
            user: question.to_string(),
        }
    }
}
