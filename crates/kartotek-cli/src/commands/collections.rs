//! Collections command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::store::{StoreOpts, resolve_registry};

#[derive(Args, Debug)]
pub struct CollectionsArgs {
    #[command(flatten)]
    pub store: StoreOpts,
}

pub async fn run(args: CollectionsArgs) -> Result<()> {
    let registry = resolve_registry(&args.store)?;

    if registry.is_empty() {
        eprintln!("{}", "No collections defined.".dimmed());
        return Ok(());
    }

    for schema in registry.iter() {
        println!("{}", schema.name.as_str().bold());
        if !schema.required_fields.is_empty() {
            output::field("  required", &schema.required_fields.join(", "));
        }
        if !schema.search_fields.is_empty() {
            output::field("  search", &schema.search_fields.join(", "));
        }
        if let Some(field) = &schema.status_field {
            output::field("  status", field);
        }
        if let Some(field) = &schema.category_field {
            output::field("  category", field);
        }
        if let Some(field) = &schema.date_field {
            output::field("  date", field);
        }
        println!();
    }

    Ok(())
}
