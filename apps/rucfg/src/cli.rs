//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rucfg - resource-unit config dispatcher
#[derive(Parser)]
#[command(name = "rucfg")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Route resource_unit config-table changes to the limiters enforcing them")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Replay a file of resource_unit row changes through the dispatcher
    Apply {
        /// JSON array of change records
        file: PathBuf,
    },

    /// Print the tenant#cluster|endpoint key for a resource unit
    Key {
        tenant: String,
        cluster: String,
        /// Virtual endpoint address
        endpoint: String,
    },
}
