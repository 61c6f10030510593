//! Create record command implementation.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use kartotek_core::traits::RecordStore;
use kartotek_core::{CollectionName, RecordFields};

use crate::output;
use crate::store::{StoreOpts, resolve_store};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Collection name
    pub collection: String,

    /// Record fields as inline JSON, @file, or - for stdin
    pub fields: String,

    #[command(flatten)]
    pub store: StoreOpts,
}

/// Read a JSON value from an inline argument, an @file reference, or stdin.
pub(crate) fn read_fields_arg(arg: &str) -> Result<Value> {
    if arg == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        serde_json::from_str(&buf).context("Invalid JSON from stdin")
    } else if let Some(path) = arg.strip_prefix('@') {
        let content = std::fs::read_to_string(path).context("Failed to read JSON file")?;
        serde_json::from_str(&content).context("Invalid JSON in file")
    } else {
        serde_json::from_str(arg).context("Invalid JSON argument")
    }
}

pub async fn run(args: CreateArgs) -> Result<()> {
    let store = resolve_store(&args.store)?;
    let collection = CollectionName::new(&args.collection).context("Invalid collection name")?;

    let value = read_fields_arg(&args.fields)?;
    let fields = RecordFields::new(value).context("Invalid record fields")?;

    let record = store
        .create(&collection, fields)
        .await
        .context("Failed to create record")?;

    println!("{}", record.id);
    output::success(&format!("Created record: {}", record.id));

    Ok(())
}
