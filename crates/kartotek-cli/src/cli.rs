//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::collections::CollectionsArgs;
use crate::commands::config::ConfigCommand;
use crate::commands::records::RecordsCommand;

/// Record store console for collections of business records.
#[derive(Parser, Debug)]
#[command(name = "kartotek")]
#[command(author, version = env!("KARTOTEK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record operations (list, get, create, update, delete)
    Records(RecordsCommand),

    /// Show the collections the active schema registry defines
    Collections(CollectionsArgs),

    /// Show or change the persisted CLI configuration
    Config(ConfigCommand),
}
