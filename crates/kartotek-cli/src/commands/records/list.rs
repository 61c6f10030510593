//! List records command implementation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;

use kartotek_core::traits::RecordStore;
use kartotek_core::{CollectionName, FilterState, PageState, paginate};

use crate::output;
use crate::store::{StoreOpts, resolve_store};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection name
    pub collection: String,

    /// Free-text search over the collection's search fields
    #[arg(long)]
    pub search: Option<String>,

    /// Exact status to match
    #[arg(long)]
    pub status: Option<String>,

    /// Exact category to match
    #[arg(long)]
    pub category: Option<String>,

    /// Inclusive start of the reference date range (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Inclusive end of the reference date range (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Number of records per page
    #[arg(long, default_value_t = kartotek_core::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Pretty-print each record
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub store: StoreOpts,
}

fn build_filter(args: &ListArgs) -> FilterState {
    let mut filter = FilterState::default();
    if let Some(term) = &args.search {
        filter = filter.with_search(term);
    }
    if let Some(status) = &args.status {
        filter = filter.with_status(status);
    }
    if let Some(category) = &args.category {
        filter = filter.with_category(category);
    }
    if let Some(from) = args.from {
        filter = filter.with_start_date(from);
    }
    if let Some(to) = args.to {
        filter = filter.with_end_date(to);
    }
    filter
}

pub async fn run(args: ListArgs) -> Result<()> {
    let store = resolve_store(&args.store)?;
    let collection = CollectionName::new(&args.collection).context("Invalid collection name")?;

    let filter = build_filter(&args);
    let page = PageState::new(args.page, args.page_size).context("Invalid page")?;

    let records = store
        .list(&collection, Some(&filter))
        .await
        .context("Failed to list records")?;

    let result = paginate(&records, &page);

    if result.items.is_empty() {
        eprintln!("{}", "No records found.".dimmed());
        return Ok(());
    }

    for record in &result.items {
        if args.pretty {
            output::record(record)?;
        } else {
            output::json(record)?;
        }
        println!();
    }

    eprintln!(
        "{}",
        format!(
            "Page {} ({} of {} record(s) shown)",
            page.page_number(),
            result.items.len(),
            records.len()
        )
        .dimmed()
    );
    if result.has_more {
        eprintln!(
            "{}: --page {}",
            "Next page".dimmed(),
            page.next().page_number()
        );
    }

    Ok(())
}
