//! Record subcommand implementations.

mod create;
mod delete;
mod get;
mod list;
mod update;

use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct RecordsCommand {
    #[command(subcommand)]
    pub command: RecordsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordsSubcommand {
    /// List the records of a collection
    List(list::ListArgs),

    /// Fetch a single record
    Get(get::GetArgs),

    /// Create a new record in a collection
    Create(create::CreateArgs),

    /// Merge fields into an existing record
    Update(update::UpdateArgs),

    /// Delete a record
    Delete(delete::DeleteArgs),
}

pub async fn handle(cmd: RecordsCommand) -> Result<()> {
    match cmd.command {
        RecordsSubcommand::List(args) => list::run(args).await,
        RecordsSubcommand::Get(args) => get::run(args).await,
        RecordsSubcommand::Create(args) => create::run(args).await,
        RecordsSubcommand::Update(args) => update::run(args).await,
        RecordsSubcommand::Delete(args) => delete::run(args).await,
    }
}
