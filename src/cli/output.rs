//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the ragbot launcher.

use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Pick colored or plain output from the `--no-color` flag.
    pub fn from_flag(no_color: bool) -> Self {
        if no_color { Self::no_color() } else { Self::new() }
    }

    /// Print the startup banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n  {} {}",
                "🚀 RAG Chatbot".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!("\n  RAG Chatbot v{}", env!("CARGO_PKG_VERSION"));
        }
        self.rule();
    }

    /// Print a horizontal separator
    pub fn rule(&self) {
        let line = "=".repeat(50);
        if self.colored {
            println!("  {}", line.dimmed());
        } else {
            println!("  {}", line);
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a fatal error that ends the process
    pub fn fatal(&self, error: &anyhow::Error) {
        if self.colored {
            eprintln!("{} {:#}", "Error:".red().bold(), error);
        } else {
            eprintln!("Error: {:#}", error);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("    {}", message.dimmed().italic());
        } else {
            println!("    [TIP] {}", message);
        }
    }

    /// Print the address to open in a browser
    pub fn url(&self, label: &str, url: &str) {
        if self.colored {
            println!("  {} {} {}", "📱".green(), label, url.bright_cyan().underline());
        } else {
            println!("  {} {}", label, url);
        }
    }

    /// Print the shutdown message
    pub fn goodbye(&self) {
        if self.colored {
            println!("\n  {} {}", "👋".yellow(), "Chatbot stopped. Goodbye!".bright_white());
        } else {
            println!("\n  Chatbot stopped. Goodbye!");
        }
    }
}
