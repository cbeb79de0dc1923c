//! CLI argument parsing.

use clap::{Parser, Subcommand};

/// Nutriscore
///
/// Scores the nutritional-knowledge content of conversation transcripts
/// against five fixed topic categories.
#[derive(Parser, Debug)]
#[command(name = "nutriscore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/nutriscore/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Scoring commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a JSON transcript file
    Score {
        /// Path to the transcript (JSON array of {role, content})
        #[arg(short, long)]
        file: String,

        /// Conversation ID (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Use Redis and the configured embedding provider instead of the
        /// offline in-process collaborators
        #[arg(long)]
        live: bool,

        /// Print the full result as JSON instead of a breakdown
        #[arg(long)]
        json: bool,
    },

    /// Read back the persisted total for a conversation
    GetScore {
        /// Conversation ID
        #[arg(long)]
        id: String,
    },

    /// Show the category catalog
    Catalog,
}
