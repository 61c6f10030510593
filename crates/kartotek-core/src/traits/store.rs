//! Record store trait.

use async_trait::async_trait;

use crate::Result;
use crate::filter::FilterState;
use crate::record::{Record, RecordFields};
use crate::types::{CollectionName, RecordId};

/// A document store holding named collections of records.
///
/// Implementations wrap an external database (or a local directory) and
/// normalize its records to the uniform [`Record`] shape. Write visibility
/// is eventual: a successful write is observable on subsequent reads, no
/// stronger consistency is assumed.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List the records of a collection, ordered by creation time.
    ///
    /// When a filter is supplied, only matching records are returned and
    /// relative order is preserved. Fails with
    /// [`StoreError::InvalidQuery`](crate::error::StoreError) if the filter
    /// constrains a key the collection's schema does not back, and with
    /// [`StoreError::Unavailable`](crate::error::StoreError) once the
    /// implementation's bounded retries are exhausted.
    async fn list(
        &self,
        collection: &CollectionName,
        filter: Option<&FilterState>,
    ) -> Result<Vec<Record>>;

    /// Get a single record by id.
    ///
    /// Returns `Ok(None)` when no record matches, rather than an error.
    async fn get(&self, collection: &CollectionName, id: &RecordId) -> Result<Option<Record>>;

    /// Create a record. The store assigns the id and timestamps.
    ///
    /// Fails with [`StoreError::Validation`](crate::error::StoreError) if
    /// fields the collection's schema requires are absent.
    async fn create(&self, collection: &CollectionName, fields: RecordFields) -> Result<Record>;

    /// Merge partial fields into an existing record.
    ///
    /// Only supplied fields change; others persist. An empty partial leaves
    /// the record's fields unchanged. Fails with
    /// [`StoreError::NotFound`](crate::error::StoreError) for an unknown id.
    async fn update(
        &self,
        collection: &CollectionName,
        id: &RecordId,
        partial: RecordFields,
    ) -> Result<Record>;

    /// Delete a record.
    ///
    /// Fails with [`StoreError::NotFound`](crate::error::StoreError) for an
    /// unknown id.
    async fn delete(&self, collection: &CollectionName, id: &RecordId) -> Result<()>;
}
