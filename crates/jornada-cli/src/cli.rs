//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Jornada - financial-goal planning assistant
#[derive(Parser)]
#[command(name = "jornada")]
#[command(about = "Conversational financial-goal planning assistant", long_about = None)]
#[command(version)]
pub struct Cli {
    /// State file path (defaults to <data dir>/jornada/state.json)
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,

    /// Conversation identity
    #[arg(long, default_value = "user_001", global = true)]
    pub user: String,

    /// Ollama base URL (falls back to OLLAMA_HOST when unset)
    #[arg(long, global = true)]
    pub ollama_url: Option<String>,

    /// Ollama model override (falls back to OLLAMA_MODEL, then `gpt-oss`)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Disable the text generator (deterministic replies only)
    #[arg(long, global = true)]
    pub no_ollama: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat with the assistant
    Chat,

    /// List saved goals
    Goals,

    /// Show the details of one goal
    Goal {
        /// Goal id, as shown by `goals`
        id: u64,
    },

    /// Check text-generator connectivity
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_defaults() {
        let cli = Cli::try_parse_from(["jornada", "chat"]).unwrap();
        assert_eq!(cli.user, "user_001");
        assert_eq!(cli.model, None);
        assert!(!cli.no_ollama);
        assert!(matches!(cli.command, Commands::Chat));
    }

    #[test]
    fn test_parse_model_override() {
        let cli = Cli::try_parse_from(["jornada", "status", "--model", "llama3.2"]).unwrap();
        assert_eq!(cli.model.as_deref(), Some("llama3.2"));
    }

    #[test]
    fn test_parse_goal_detail() {
        let cli = Cli::try_parse_from(["jornada", "goal", "3", "--user", "ana"]).unwrap();
        assert_eq!(cli.user, "ana");
        assert!(matches!(cli.command, Commands::Goal { id: 3 }));
    }

    #[test]
    fn test_goal_requires_numeric_id() {
        assert!(Cli::try_parse_from(["jornada", "goal", "tres"]).is_err());
    }
}
