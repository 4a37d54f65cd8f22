//! `ventas` - reconciliation jobs for the dual-currency sales ledger

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::CliConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = CliConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .init();

    Cli::parse().run(&config)
}
