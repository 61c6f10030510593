//! Async list-screen orchestration over a record store.

use tracing::{debug, instrument};

use crate::Result;
use crate::filter::FilterState;
use crate::page::PageState;
use crate::record::{Record, RecordFields};
use crate::schema::CollectionSchema;
use crate::traits::RecordStore;
use crate::types::{CollectionName, RecordId};

use super::state::{Phase, ScreenEvent, ScreenState};

/// Drives one list screen against a record store.
///
/// The controller owns a [`ScreenState`] and feeds it events around store
/// calls: fetch results, filter and page changes, mutation outcomes. All
/// mutations refresh the displayed page on success and leave it untouched
/// on failure. Filter and page changes recompute the visible slice from
/// the locally held superset without refetching; [`refresh`] re-syncs with
/// the store.
///
/// [`refresh`]: ListScreen::refresh
pub struct ListScreen<S> {
    store: S,
    collection: CollectionName,
    state: ScreenState,
}

impl<S: RecordStore> ListScreen<S> {
    /// Create an idle screen for the collection the schema describes.
    pub fn new(store: S, schema: CollectionSchema) -> Self {
        let collection = schema.name.clone();
        Self {
            store,
            collection,
            state: ScreenState::new(schema),
        }
    }

    /// The full screen state.
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// The records visible on the current page.
    pub fn items(&self) -> &[Record] {
        self.state.items()
    }

    /// Whether a subsequent page exists for the current filters.
    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// The last surfaced error, if any.
    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// The active filters.
    pub fn filter(&self) -> &FilterState {
        self.state.filter()
    }

    /// The current page position.
    pub fn page(&self) -> &PageState {
        self.state.page()
    }

    /// Fetch the collection and re-derive the visible page.
    ///
    /// On failure the previous page stays visible and the error is
    /// surfaced in the state as well as returned.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn refresh(&mut self) -> Result<()> {
        self.apply(ScreenEvent::FetchStarted);
        let generation = self.state.generation();

        debug!(generation, "Fetching collection");
        match self.store.list(&self.collection, None).await {
            Ok(records) => {
                self.apply(ScreenEvent::FetchCompleted {
                    generation,
                    outcome: Ok(records),
                });
                Ok(())
            }
            Err(e) => {
                self.apply(ScreenEvent::FetchCompleted {
                    generation,
                    outcome: Err(e.to_string()),
                });
                Err(e)
            }
        }
    }

    /// Replace the filters, reset to page 1, and recompute locally.
    ///
    /// Triggers an initial fetch when nothing has been loaded yet.
    pub async fn set_filter(&mut self, filter: FilterState) -> Result<()> {
        let needs_initial_fetch = self.state.phase() == Phase::Idle;
        self.apply(ScreenEvent::FilterChanged(filter));
        if needs_initial_fetch {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Move to the given page and recompute locally.
    pub fn set_page(&mut self, page: PageState) {
        self.apply(ScreenEvent::PageChanged(page));
    }

    /// Move to the next page.
    pub fn next_page(&mut self) {
        self.set_page(self.state.page().next());
    }

    /// Move to the previous page, saturating at page 1.
    pub fn previous_page(&mut self) {
        self.set_page(self.state.page().previous());
    }

    /// Create a record and refresh the displayed page.
    #[instrument(skip(self, fields), fields(collection = %self.collection))]
    pub async fn create(&mut self, fields: RecordFields) -> Result<Record> {
        match self.store.create(&self.collection, fields).await {
            Ok(record) => {
                debug!(id = %record.id, "Created record");
                self.refresh().await?;
                Ok(record)
            }
            Err(e) => {
                self.apply(ScreenEvent::MutationFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Merge partial fields into a record and refresh the displayed page.
    #[instrument(skip(self, partial), fields(collection = %self.collection, %id))]
    pub async fn update(&mut self, id: &RecordId, partial: RecordFields) -> Result<Record> {
        match self.store.update(&self.collection, id, partial).await {
            Ok(record) => {
                debug!(id = %record.id, "Updated record");
                self.refresh().await?;
                Ok(record)
            }
            Err(e) => {
                self.apply(ScreenEvent::MutationFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Delete a record and refresh the displayed page.
    #[instrument(skip(self), fields(collection = %self.collection, %id))]
    pub async fn delete(&mut self, id: &RecordId) -> Result<()> {
        match self.store.delete(&self.collection, id).await {
            Ok(()) => {
                debug!(%id, "Deleted record");
                self.refresh().await
            }
            Err(e) => {
                self.apply(ScreenEvent::MutationFailed(e.to_string()));
                Err(e)
            }
        }
    }

    fn apply(&mut self, event: ScreenEvent) {
        // The reducer consumes the state; swap a placeholder in while the
        // successor is computed.
        let placeholder = ScreenState::new(self.state.schema().clone());
        let state = std::mem::replace(&mut self.state, placeholder);
        self.state = state.apply(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, StoreError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Store stub: serves a fixed list, fails on demand, rejects one id.
    struct StubStore {
        records: Mutex<Vec<Record>>,
        fail_listing: Mutex<bool>,
    }

    impl StubStore {
        fn with_records(count: usize) -> Self {
            let records = (0..count)
                .map(|i| Record {
                    id: RecordId::new(format!("r{:03}", i)).unwrap(),
                    created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                    updated_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                    fields: RecordFields::new(json!({
                        "name": format!("Company {}", i),
                        "status": if i % 2 == 0 { "active" } else { "inactive" }
                    }))
                    .unwrap(),
                })
                .collect();
            Self {
                records: Mutex::new(records),
                fail_listing: Mutex::new(false),
            }
        }

        fn fail_next_listing(&self) {
            *self.fail_listing.lock().unwrap() = true;
        }
    }

    #[async_trait]
    impl RecordStore for &StubStore {
        async fn list(
            &self,
            _collection: &CollectionName,
            _filter: Option<&FilterState>,
        ) -> Result<Vec<Record>> {
            if std::mem::take(&mut *self.fail_listing.lock().unwrap()) {
                return Err(Error::Store(StoreError::Unavailable {
                    message: "connection refused".to_string(),
                    attempts: 3,
                }));
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn get(
            &self,
            _collection: &CollectionName,
            id: &RecordId,
        ) -> Result<Option<Record>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| &r.id == id)
                .cloned())
        }

        async fn create(
            &self,
            _collection: &CollectionName,
            fields: RecordFields,
        ) -> Result<Record> {
            let mut records = self.records.lock().unwrap();
            let record = Record {
                id: RecordId::new(format!("r{:03}", records.len())).unwrap(),
                created_at: "2024-06-01T00:00:00Z".parse().unwrap(),
                updated_at: "2024-06-01T00:00:00Z".parse().unwrap(),
                fields,
            };
            records.push(record.clone());
            Ok(record)
        }

        async fn update(
            &self,
            collection: &CollectionName,
            id: &RecordId,
            partial: RecordFields,
        ) -> Result<Record> {
            let mut records = self.records.lock().unwrap();
            let record = records.iter_mut().find(|r| &r.id == id).ok_or_else(|| {
                Error::Store(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })
            })?;
            record.fields = record.fields.merged(&partial);
            Ok(record.clone())
        }

        async fn delete(&self, collection: &CollectionName, id: &RecordId) -> Result<()> {
            let mut records = self.records.lock().unwrap();
            let index = records.iter().position(|r| &r.id == id).ok_or_else(|| {
                Error::Store(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })
            })?;
            records.remove(index);
            Ok(())
        }
    }

    fn schema() -> CollectionSchema {
        CollectionSchema::new(CollectionName::new("companies").unwrap())
            .require("name")
            .search_over(["name"])
            .status_in("status")
    }

    #[tokio::test]
    async fn refresh_loads_first_page() {
        let store = StubStore::with_records(30);
        let mut screen = ListScreen::new(&store, schema());

        screen.refresh().await.unwrap();

        assert_eq!(screen.phase(), Phase::Loaded);
        assert_eq!(screen.items().len(), 25);
        assert!(screen.has_more());
    }

    #[tokio::test]
    async fn failed_refresh_surfaces_error_and_keeps_page() {
        let store = StubStore::with_records(5);
        let mut screen = ListScreen::new(&store, schema());
        screen.refresh().await.unwrap();

        store.fail_next_listing();
        let result = screen.refresh().await;

        assert!(result.is_err());
        assert_eq!(screen.phase(), Phase::Failed);
        assert!(screen.error().unwrap().contains("unavailable"));
        assert_eq!(screen.items().len(), 5);

        // Recoverable via explicit refresh.
        screen.refresh().await.unwrap();
        assert_eq!(screen.phase(), Phase::Loaded);
        assert!(screen.error().is_none());
    }

    #[tokio::test]
    async fn filter_recomputes_locally() {
        let store = StubStore::with_records(10);
        let mut screen = ListScreen::new(&store, schema());
        screen.refresh().await.unwrap();

        screen
            .set_filter(FilterState::default().with_status("active"))
            .await
            .unwrap();

        assert_eq!(screen.items().len(), 5);
        assert_eq!(screen.page().page_number(), 1);
    }

    #[tokio::test]
    async fn set_filter_on_idle_screen_fetches() {
        let store = StubStore::with_records(4);
        let mut screen = ListScreen::new(&store, schema());

        screen
            .set_filter(FilterState::default().with_status("active"))
            .await
            .unwrap();

        assert_eq!(screen.phase(), Phase::Loaded);
        assert_eq!(screen.items().len(), 2);
    }

    #[tokio::test]
    async fn create_refreshes_list() {
        let store = StubStore::with_records(2);
        let mut screen = ListScreen::new(&store, schema());
        screen.refresh().await.unwrap();

        let fields = RecordFields::new(json!({ "name": "Initech", "status": "active" })).unwrap();
        let created = screen.create(fields).await.unwrap();

        assert_eq!(created.field_str("name"), Some("Initech"));
        assert_eq!(screen.items().len(), 3);
    }

    #[tokio::test]
    async fn failed_delete_keeps_list_untouched() {
        let store = StubStore::with_records(3);
        let mut screen = ListScreen::new(&store, schema());
        screen.refresh().await.unwrap();

        let missing = RecordId::new("r999").unwrap();
        let result = screen.delete(&missing).await;

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(screen.phase(), Phase::Loaded);
        assert_eq!(screen.items().len(), 3);
        assert!(screen.error().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn pagination_walks_pages() {
        let store = StubStore::with_records(25);
        let mut screen = ListScreen::new(&store, schema());
        screen.refresh().await.unwrap();
        screen.set_page(PageState::new(1, 10).unwrap());

        assert_eq!(screen.items().len(), 10);
        screen.next_page();
        assert_eq!(screen.items().len(), 10);
        screen.next_page();
        assert_eq!(screen.items().len(), 5);
        assert!(!screen.has_more());
        screen.next_page();
        assert!(screen.items().is_empty());
        screen.previous_page();
        assert_eq!(screen.items().len(), 5);
    }
}
