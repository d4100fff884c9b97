//! Jornada CLI - goal-planning chat assistant
//!
//! Usage:
//!   jornada chat              Talk to the assistant
//!   jornada goals             List saved goals
//!   jornada goal 1            Show one goal
//!   jornada status            Check Ollama connectivity

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn, to keep
    // the chat output clean)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Chat => commands::cmd_chat(&cli).await,
        Commands::Goals => commands::cmd_goals(&cli),
        Commands::Goal { id } => commands::cmd_goal(&cli, id),
        Commands::Status => commands::cmd_status(&cli).await,
    }
}
