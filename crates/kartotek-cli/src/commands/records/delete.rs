//! Delete record command implementation.

use anyhow::{Context, Result};
use clap::Args;

use kartotek_core::traits::RecordStore;
use kartotek_core::{CollectionName, RecordId};

use crate::output;
use crate::store::{StoreOpts, resolve_store};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection name
    pub collection: String,

    /// Record id
    pub id: String,

    #[command(flatten)]
    pub store: StoreOpts,
}

pub async fn run(args: DeleteArgs) -> Result<()> {
    let store = resolve_store(&args.store)?;
    let collection = CollectionName::new(&args.collection).context("Invalid collection name")?;
    let id = RecordId::new(&args.id).context("Invalid record id")?;

    store
        .delete(&collection, &id)
        .await
        .context("Failed to delete record")?;

    output::success(&format!("Deleted record: {}", id));

    Ok(())
}
