//! Update record command implementation.

use anyhow::{Context, Result};
use clap::Args;

use kartotek_core::traits::RecordStore;
use kartotek_core::{CollectionName, RecordFields, RecordId};

use crate::output;
use crate::store::{StoreOpts, resolve_store};

use super::create::read_fields_arg;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Collection name
    pub collection: String,

    /// Record id
    pub id: String,

    /// Partial fields as inline JSON, @file, or - for stdin; only the
    /// supplied keys change
    pub fields: String,

    #[command(flatten)]
    pub store: StoreOpts,
}

pub async fn run(args: UpdateArgs) -> Result<()> {
    let store = resolve_store(&args.store)?;
    let collection = CollectionName::new(&args.collection).context("Invalid collection name")?;
    let id = RecordId::new(&args.id).context("Invalid record id")?;

    let value = read_fields_arg(&args.fields)?;
    let partial = RecordFields::new(value).context("Invalid record fields")?;

    let record = store
        .update(&collection, &id, partial)
        .await
        .context("Failed to update record")?;

    output::success(&format!("Updated record: {}", record.id));
    output::json(&record)?;

    Ok(())
}
