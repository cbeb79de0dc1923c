//! Nutriscore CLI
//!
//! Scores conversation transcripts against the healthy-eating catalog.
//!
//! # Usage
//!
//! ```bash
//! nutriscore score --file transcript.json [--id ID] [--live] [--json]
//! nutriscore get-score --id ID
//! nutriscore catalog
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/nutriscore/config.toml)
//! 3. Environment variables (NUTRISCORE_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use score_cli::{handle_catalog, handle_get_score, handle_score, Cli, Commands};
use score_types::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| settings.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match cli.command {
        Commands::Score {
            file,
            id,
            live,
            json,
        } => {
            handle_score(&settings, &file, id, live, json).await?;
        }
        Commands::GetScore { id } => {
            handle_get_score(&settings, &id).await?;
        }
        Commands::Catalog => {
            handle_catalog()?;
        }
    }

    Ok(())
}
