//! CLI module for ragbot
//!
//! Provides command-line interface parsing for the `ragbot` launcher.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

/// Colored terminal output.
pub mod output;
/// Checks run before the server starts.
pub mod preflight;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ragbot - a retrieval-augmented chatbot server
///
/// Answers questions over a pre-built vector store through a small web UI.
#[derive(Parser, Debug)]
#[command(
    name = "ragbot",
    version,
    about = "A retrieval-augmented chatbot web server",
    long_about = "Answers questions using documents retrieved from a pre-built vector store\n\
                  and a hosted LLM, through a small web chat UI.\n\n\
                  Run without arguments to check the environment and start the server.",
    after_help = "EXAMPLES:\n    \
                  ragbot                           # Run pre-flight checks and start the server\n    \
                  ragbot serve --port 8080         # Serve on a different port\n    \
                  ragbot check                     # Only run the pre-flight checks\n    \
                  ragbot ask \"What is RAG?\"        # Answer one question from the terminal\n    \
                  ragbot --config my.toml config   # Print the effective configuration"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "ragbot.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run pre-flight checks, then start the web server (the default)
    Serve {
        /// Host address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Start even if a required pre-flight check fails
        #[arg(long)]
        skip_checks: bool,
    },

    /// Run the pre-flight checks and exit
    Check,

    /// Answer a single question and print it
    Ask {
        /// The question to ask
        question: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
