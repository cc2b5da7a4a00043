//! rucfg - resource-unit config dispatcher
//!
//! Composition root: loads configuration, builds the limiter processors and
//! the dispatcher, and drives them through the config-table framework.

mod changes;
mod cli;
mod display;
mod error;
mod logging;
mod setup;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::setup::SystemSetup;
use clap::Parser;
use rucfg_config::Config;
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        // Config failures happen before the subscriber exists, so the
        // error always goes to stderr directly.
        if json_mode {
            eprintln!("{}", e.to_json());
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    // Configuration precedence: file (or defaults), then environment.
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;

    logging::init_tracing(&config, cli.global.json, cli.global.debug);
    info!("Starting rucfg v{}", env!("CARGO_PKG_VERSION"));

    let renderer = OutputRenderer::new(cli.global.json);

    match cli.command {
        Commands::Apply { file } => {
            let records = changes::load_changes(&file).await?;
            let setup = SystemSetup::initialize(&config)?;
            let report = setup.apply(&records);
            renderer.render_apply_report(&report)?;

            let failed = report.outcomes.iter().filter(|o| !o.is_ok()).count();
            info!(total = report.outcomes.len(), failed, "replay completed");
        }
        Commands::Key {
            tenant,
            cluster,
            endpoint,
        } => {
            let key = rucfg_unit::build_key(&tenant, &cluster, &endpoint)?;
            renderer.render_key(&key)?;
        }
    }

    Ok(())
}
