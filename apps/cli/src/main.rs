//! DocuSearch command-line client entry point.

mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting DocuSearch client"
    );

    let mut config = match ClientConfig::load(cli.config.as_deref()) {
        Ok(c) => {
            tracing::info!(base_url = %c.base_url, "configuration loaded");
            c
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            ClientConfig::default()
        }
    };

    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(session) = cli.session {
        config.session_cookie = Some(session);
    }

    commands::run(cli.command, config, cli.config.as_deref()).await
}
