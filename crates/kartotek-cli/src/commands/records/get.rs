//! Get record command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use kartotek_core::traits::RecordStore;
use kartotek_core::{CollectionName, RecordId};

use crate::output;
use crate::store::{StoreOpts, resolve_store};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Collection name
    pub collection: String,

    /// Record id
    pub id: String,

    /// Pretty-print the record
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub store: StoreOpts,
}

pub async fn run(args: GetArgs) -> Result<()> {
    let store = resolve_store(&args.store)?;
    let collection = CollectionName::new(&args.collection).context("Invalid collection name")?;
    let id = RecordId::new(&args.id).context("Invalid record id")?;

    let record = store
        .get(&collection, &id)
        .await
        .context("Failed to get record")?;

    match record {
        Some(record) => {
            if args.pretty {
                output::record(&record)?;
            } else {
                output::json(&record)?;
            }
            Ok(())
        }
        None => {
            eprintln!("{}", "Record not found.".dimmed());
            Ok(())
        }
    }
}
