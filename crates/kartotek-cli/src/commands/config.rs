//! Config command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use kartotek_core::StoreUrl;

use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Show the persisted configuration
    Show,

    /// Set configuration values
    Set(SetArgs),

    /// Remove the persisted configuration
    Clear,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Default store URL (file:///path or https://host)
    #[arg(long)]
    pub store: Option<String>,

    /// API token for network stores
    #[arg(long)]
    pub token: Option<String>,

    /// Path of a JSON schema registry
    #[arg(long)]
    pub schemas: Option<PathBuf>,
}

pub async fn handle(cmd: ConfigCommand) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(),
        ConfigSubcommand::Set(args) => set(args),
        ConfigSubcommand::Clear => clear(),
    }
}

fn show() -> Result<()> {
    let config = config::load()?;

    output::field("store", config.store.as_deref().unwrap_or("(not set)"));
    output::field(
        "token",
        if config.token.is_some() {
            "(set)"
        } else {
            "(not set)"
        },
    );
    match &config.schemas {
        Some(path) => output::field("schemas", &path.display().to_string()),
        None => output::field("schemas", "(built-in)"),
    }

    Ok(())
}

fn set(args: SetArgs) -> Result<()> {
    let mut config = config::load()?;

    if let Some(store) = args.store {
        // Validate before persisting
        StoreUrl::new(&store).context("Invalid store URL")?;
        config.store = Some(store);
    }
    if let Some(token) = args.token {
        config.token = Some(token);
    }
    if let Some(schemas) = args.schemas {
        config.schemas = Some(schemas);
    }

    config::save(&config)?;
    output::success("Configuration saved");

    Ok(())
}

fn clear() -> Result<()> {
    config::clear()?;
    eprintln!("{}", "Configuration cleared.".dimmed());
    Ok(())
}
