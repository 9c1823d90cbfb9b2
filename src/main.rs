use anyhow::{Context, Result};
use ragbot::{
    AppState, RagChatbot, RagbotConfig,
    api::routes::create_router,
    cli::{Cli, Commands, output::Output, preflight::run_preflight},
    utils::config::ConfigError,
};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = Output::from_flag(cli.no_color);

    if let Err(e) = run(cli, &output).await {
        output.fatal(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let config = match RagbotConfig::load(&cli.config) {
        Ok(config) => {
            init_tracing(&config, cli.verbose);
            config
        }
        Err(ConfigError::FileNotFound(path)) => {
            let config = RagbotConfig::default();
            init_tracing(&config, cli.verbose);
            tracing::info!(path = %path.display(), "No config file found, using defaults");
            config
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load {}", cli.config.display()));
        }
    };

    match cli.command {
        None => serve(config, output, None, None, false).await,
        Some(Commands::Serve {
            host,
            port,
            skip_checks,
        }) => serve(config, output, host, port, skip_checks).await,
        Some(Commands::Check) => check(&config, output),
        Some(Commands::Ask { question }) => ask(&config, &question).await,
        Some(Commands::Config) => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn init_tracing(config: &RagbotConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Print the pre-flight report; exit 1 if a required check failed.
fn preflight(config: &RagbotConfig, output: &Output) -> Result<bool> {
    let base_dir = std::env::current_dir().context("Cannot determine working directory")?;
    let report = run_preflight(config, &base_dir);
    report.print(output);
    Ok(report.passed())
}

fn check(config: &RagbotConfig, output: &Output) -> Result<()> {
    output.header("Pre-flight checks");
    if !preflight(config, output)? {
        std::process::exit(1);
    }
    output.success("All checks passed!");
    Ok(())
}

async fn ask(config: &RagbotConfig, question: &str) -> Result<()> {
    let chatbot = RagChatbot::initialize(config).await;
    println!("{}", chatbot.answer(question).await);
    Ok(())
}

async fn serve(
    mut config: RagbotConfig,
    output: &Output,
    host: Option<String>,
    port: Option<u16>,
    skip_checks: bool,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    output.banner();
    let passed = preflight(&config, output)?;
    if !passed && !skip_checks {
        std::process::exit(1);
    }
    output.rule();

    let chatbot = RagChatbot::initialize(&config).await;
    if chatbot.is_available() {
        output.success("All checks passed! Starting the web server...");
    } else {
        output.warning("RAG system unavailable; the server will answer with an apology");
    }

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    output.url(
        "Open your browser and go to:",
        &format!("http://localhost:{}", config.server.port),
    );
    output.info("Press Ctrl+C to stop the server");
    output.rule();

    tracing::info!(address = %addr, "Server listening");

    let state = AppState {
        config: Arc::new(config),
        chatbot: Arc::new(chatbot),
    };

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    output.goodbye();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
