//! Command-line interface for strictly_gomoku.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Gomoku - play five-in-a-row against an LLM
#[derive(Parser, Debug)]
#[command(name = "strictly_gomoku")]
#[command(about = "Gomoku on a 15x15 board against a remote LLM agent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Path to agent configuration file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Play against a local random mover instead of an LLM
        #[arg(long)]
        offline: bool,
    },

    /// Serve the game over HTTP
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to agent configuration file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Play against a local random mover instead of an LLM
        #[arg(long)]
        offline: bool,
    },
}
