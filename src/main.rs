//! Strictly Gomoku - Unified CLI
//!
//! Human (black) against an LLM agent (white), in the terminal or over HTTP.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use strictly_gomoku::{AgentConfig, TurnOrchestrator, TurnSettings, build_provider};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { config, offline } => run_play(config, offline).await,
        Command::Serve {
            port,
            host,
            config,
            offline,
        } => run_serve(host, port, config, offline).await,
    }
}

/// Play in the terminal.
async fn run_play(config: Option<PathBuf>, offline: bool) -> Result<()> {
    // The TUI installs its own file subscriber, so nothing is logged before this.
    let orchestrator = create_orchestrator(config, offline)?;
    strictly_gomoku::run_tui(orchestrator).await
}

/// Serve the game over HTTP.
async fn run_serve(host: String, port: u16, config: Option<PathBuf>, offline: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Strictly Gomoku HTTP server");
    let orchestrator = create_orchestrator(config, offline)?;
    strictly_gomoku::serve(host, port, orchestrator).await
}

#[instrument]
fn create_orchestrator(config: Option<PathBuf>, offline: bool) -> Result<TurnOrchestrator> {
    let config = AgentConfig::load(config.as_deref())?;
    let provider = build_provider(&config, offline)?;
    info!(agent = %config.name(), provider = %provider.name(), "Agent ready");
    Ok(TurnOrchestrator::new(provider, TurnSettings::from(&config)))
}
