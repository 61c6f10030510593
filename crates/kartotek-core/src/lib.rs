//! kartotek-core - Core types and traits for the kartotek records console.

pub mod error;
pub mod filter;
pub mod page;
pub mod record;
pub mod schema;
pub mod screen;
pub mod traits;
pub mod types;

pub use error::Error;
pub use filter::{FilterState, Predicate};
pub use page::{DEFAULT_PAGE_SIZE, ListResult, PageState, paginate};
pub use record::{Record, RecordFields};
pub use schema::{CollectionSchema, SchemaRegistry};
pub use screen::{ListScreen, Phase, ScreenEvent, ScreenState};
pub use traits::RecordStore;
pub use types::{CollectionName, RecordId, StoreUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
