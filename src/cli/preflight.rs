//! Pre-flight checks run before the server starts.
//!
//! A failed check blocks startup; a warning is printed and ignored.

use crate::cli::output::Output;
use crate::utils::config::{RagbotConfig, VectorStoreConfig};
use std::path::{Path, PathBuf};

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Nothing to report.
    Pass,
    /// Printed, startup continues.
    Warn,
    /// Startup is blocked.
    Fail,
}

/// Result of one named check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Stable identifier, e.g. `vector_store`.
    pub name: &'static str,
    /// Pass, warn or fail.
    pub status: CheckStatus,
    /// Line shown to the user.
    pub message: String,
    /// What to do about a warning or failure.
    pub hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Pass,
            message: message.into(),
            hint: None,
        }
    }

    fn warn(name: &'static str, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Warn,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    fn fail(name: &'static str, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Fail,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

/// All check results, in the order they ran.
#[derive(Debug, Clone, Default)]
pub struct PreflightReport {
    /// Individual results.
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// True when no check failed. Warnings don't count.
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.status != CheckStatus::Fail)
    }

    /// Look up a check by name.
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Print every result with its hint.
    pub fn print(&self, output: &Output) {
        for check in &self.checks {
            match check.status {
                CheckStatus::Pass => output.success(&check.message),
                CheckStatus::Warn => output.warning(&check.message),
                CheckStatus::Fail => output.error(&check.message),
            }
            if let Some(hint) = &check.hint {
                output.hint(hint);
            }
        }
    }
}

/// Run every check. Relative paths are resolved against `base_dir`.
pub fn run_preflight(config: &RagbotConfig, base_dir: &Path) -> PreflightReport {
    PreflightReport {
        checks: vec![
            check_providers(config),
            check_vector_store(config, base_dir),
            check_env_file(base_dir),
            check_credentials(config),
        ],
    }
}

fn check_providers(config: &RagbotConfig) -> CheckResult {
    let missing: Vec<String> = [
        ("llm", config.llm.provider_name(), config.llm.is_compiled()),
        (
            "embeddings",
            config.embeddings.provider_name(),
            config.embeddings.is_compiled(),
        ),
        (
            "vector_store",
            config.vector_store.provider_name(),
            config.vector_store.is_compiled(),
        ),
    ]
    .into_iter()
    .filter(|(_, _, compiled)| !compiled)
    .map(|(section, provider, _)| format!("{}.provider = \"{}\"", section, provider))
    .collect();

    if missing.is_empty() {
        CheckResult::pass("providers", "All configured providers are available!")
    } else {
        CheckResult::fail(
            "providers",
            format!("Providers not compiled into this binary: {}", missing.join(", ")),
            "Rebuild with the matching Cargo feature (ollama, local-embeddings, chromadb)",
        )
    }
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn check_vector_store(config: &RagbotConfig, base_dir: &Path) -> CheckResult {
    match &config.vector_store {
        VectorStoreConfig::Local { path, .. } => {
            if resolve(base_dir, path).is_dir() {
                CheckResult::pass("vector_store", "Vector store found!")
            } else {
                CheckResult::fail(
                    "vector_store",
                    format!("Vector store not found at {}", path),
                    "Run the ingestion notebook first to create the vector database.",
                )
            }
        }
        // Reachability is only known once we connect.
        VectorStoreConfig::ChromaDB { url, .. } => {
            CheckResult::pass("vector_store", format!("Using ChromaDB server at {}", url))
        }
    }
}

fn check_env_file(base_dir: &Path) -> CheckResult {
    if base_dir.join(".env").is_file() {
        CheckResult::pass("env_file", ".env file found!")
    } else {
        CheckResult::warn(
            "env_file",
            ".env file not found.",
            "Make sure your API key is configured in the environment.",
        )
    }
}

fn check_credentials(config: &RagbotConfig) -> CheckResult {
    let Some(env_name) = config.llm.api_key_env() else {
        return CheckResult::pass("credentials", "No API key required");
    };

    match RagbotConfig::resolve_env(env_name) {
        Ok(value) if !value.trim().is_empty() => {
            CheckResult::pass("credentials", format!("{} is set", env_name))
        }
        _ => CheckResult::warn(
            "credentials",
            format!("{} is not set", env_name),
            "The chatbot will start but answer that it is not available.",
        ),
    }
}
