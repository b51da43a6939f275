use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use ragchat_application::ChatApp;
use ragchat_core::config::ClientConfig;
use ragchat_infrastructure::{ConfigService, RagchatPaths, TomlIdentityRepository};
use ragchat_interaction::ApiClient;

mod command;
mod helper;
mod render;
mod repl;

#[derive(Parser)]
#[command(name = "ragchat", version)]
#[command(about = "Terminal client for the RAG chatbot service", long_about = None)]
struct Cli {
    /// Chat service URL (overrides config.toml and RAGCHAT_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding config.toml and identity.toml
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// tracing filter used when RUST_LOG is unset, e.g. "debug"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the chat service is reachable and healthy
    Status,
    /// Print the effective configuration
    Config {
        /// Write it to config.toml
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match &cli.config_dir {
        Some(dir) => RagchatPaths::with_root(dir),
        None => RagchatPaths::platform_default()?,
    };
    let config_service = ConfigService::new(&paths);
    let mut config = config_service
        .load()
        .with_context(|| format!("failed to load {}", paths.config_file().display()))?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate()?;

    init_tracing(&config);
    tracing::debug!(base_url = %config.base_url, root = %paths.root().display(), "ragchat starting");

    if let Some(Commands::Config { save }) = cli.command {
        print!("{}", toml::to_string_pretty(&config)?);
        if save {
            config_service.save(&config)?;
            println!(
                "{}",
                format!("Saved to {}", paths.config_file().display()).green()
            );
        }
        return Ok(());
    }

    let backend = Arc::new(ApiClient::from_config(&config)?);
    let identities = Arc::new(TomlIdentityRepository::new(&paths));
    let mut app = ChatApp::new(backend, identities, &config);

    match cli.command {
        Some(Commands::Status) => {
            let report = app.status().await;
            for line in render::status(&report) {
                println!("{line}");
            }
            if report.probe.is_err() || report.health.is_err() {
                std::process::exit(1);
            }
            Ok(())
        }
        _ => repl::run(&mut app).await,
    }
}

/// Logs go to stderr so they never interleave with the transcript on stdout.
fn init_tracing(config: &ClientConfig) {
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match config.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: log level '{}' is not a valid tracing filter ({}); falling back to 'warn'",
                    config.log_level, e
                );
                tracing_subscriber::EnvFilter::new("warn")
            }
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
