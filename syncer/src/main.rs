//! Statement-counts sync job binary.
//!
//! Pulls the upstream paper statement-counts collection page by page and
//! merges it into the destination Postgres table. Runs once by default, or
//! periodically when an interval is configured. Also carries the destination
//! schema migrations.

use anyhow::{Context, anyhow};
use scikgdash_config::load_config;
use scikgdash_config::shared::SyncerConfig;
use scikgdash_telemetry::tracing::init_tracing;
use std::env;
use tracing::{error, info};

use crate::core::start_syncer_with_config;

mod core;
mod migrations;

/// Entry point for the syncer job.
///
/// Loads configuration, initializes tracing, starts the async runtime, and
/// either runs the sync or applies migrations depending on the command.
fn main() -> anyhow::Result<()> {
    // Initialize tracing from the binary name
    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"))?;

    // We start the runtime.
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())?;

    Ok(())
}

/// Main async function that handles command-line arguments and starts the job.
///
/// Supports two modes: sync mode (no arguments) and migration mode ("migrate" argument).
async fn async_main() -> anyhow::Result<()> {
    let mut args = env::args();
    match args.len() {
        // Run the sync job
        1 => {
            let config =
                load_config::<SyncerConfig>().context("loading syncer configuration")?;
            config
                .validate()
                .context("validating syncer configuration")?;

            start_syncer_with_config(config).await?;
        }
        // Handle single commands
        2 => {
            let command = args.nth(1).unwrap();
            match command.as_str() {
                "migrate" => {
                    let config = load_config::<SyncerConfig>()
                        .context("loading syncer configuration for migrations")?;
                    migrations::migrate_destination(&config.pg_connection).await?;
                    info!("destination database migrated successfully");
                }
                _ => {
                    error!(%command, "invalid command");
                    return Err(anyhow!("invalid command: {command}"));
                }
            }
        }
        _ => {
            error!("invalid number of command line arguments");
            return Err(anyhow!("invalid number of command line arguments"));
        }
    }

    Ok(())
}
