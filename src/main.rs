//! itsictl - declarative CLI for Splunk ITSI glass tables and episode comments.
//!
//! Each invocation runs exactly one module: parameters are reconciled
//! against remote state, at most one write call is made, and the result
//! document is printed to stdout as JSON. Failures print a
//! `{"failed": true, "msg": ...}` document and exit nonzero.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `ITSI_BASE_URL`: Splunk management URL (e.g., `https://splunk:8089`)
//! - `ITSI_TOKEN`: Bearer token for authentication
//!
//! # Usage
//!
//! ```bash
//! itsictl glass-table --glass-table-id 6992e850... --description "Updated"
//! itsictl glass-table-info --count 10 --sort-key mod_time --sort-dir desc
//! itsictl episode-comment --episode-key ff9421... --comment "Investigating"
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use itsictl::cli::{Cli, Command};
use itsictl::config::Config;
use itsictl::error::ItsiError;
use itsictl::itsi_client::ItsiClient;
use itsictl::modules::{episode_comment, glass_table, glass_table_info, ModuleResult};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // Logging goes to stderr: stdout is reserved for the result document
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("itsictl=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::debug!("Configuration loaded, base_url: {}", config.base_url);

    let client = ItsiClient::new(&config).context("Failed to create ITSI client")?;

    let outcome = run_command(&client, cli.command, cli.check).await;

    match outcome {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            let msg = e.sanitized_display(client.token_for_sanitization());
            tracing::error!(error = %msg, "Module invocation failed");
            let failure = json!({ "failed": true, "msg": msg });
            println!("{}", serde_json::to_string_pretty(&failure)?);
            std::process::exit(1);
        }
    }
}

/// Dispatches one module invocation.
async fn run_command(
    client: &ItsiClient,
    command: Command,
    check_mode: bool,
) -> Result<ModuleResult, ItsiError> {
    match command {
        Command::GlassTable(args) => {
            let params = args.into_params()?;
            glass_table::run(client, &params, check_mode).await
        }
        Command::GlassTableInfo(args) => glass_table_info::run(client, &args.into()).await,
        Command::EpisodeComment(args) => {
            episode_comment::run(client, &args.into(), check_mode).await
        }
    }
}
