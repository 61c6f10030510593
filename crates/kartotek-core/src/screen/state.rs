//! Pure list-screen state and reducer.

use serde::{Deserialize, Serialize};

use crate::filter::{FilterState, Predicate};
use crate::page::{ListResult, PageState, paginate};
use crate::record::Record;
use crate::schema::CollectionSchema;

/// The lifecycle phase of a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing fetched yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The visible page reflects the latest applied fetch.
    Loaded,
    /// The latest applied fetch failed; the previous page is retained.
    Failed,
}

/// An input to the list-screen reducer.
///
/// Events are the only way the state changes. The async orchestration in
/// [`ListScreen`](crate::screen::ListScreen) feeds store results in as
/// events; a UI shell running its own task model can do the same directly.
#[derive(Debug)]
pub enum ScreenEvent {
    /// A fetch was dispatched. Bumps the generation and enters `Loading`.
    FetchStarted,

    /// A fetch finished. Applied only if `generation` still matches the
    /// state's current generation; a stale completion is discarded.
    FetchCompleted {
        generation: u64,
        outcome: Result<Vec<Record>, String>,
    },

    /// The user changed the filters. Resets to page 1 and recomputes the
    /// visible slice from the cached superset.
    FilterChanged(FilterState),

    /// The user moved to another page.
    PageChanged(PageState),

    /// A create/update/delete failed. Surfaces the error without touching
    /// the visible list.
    MutationFailed(String),

    /// Drop all cached data and return to `Idle`.
    Reset,
}

/// The complete state of one list screen.
///
/// The state is a plain value: [`apply`](ScreenState::apply) consumes it
/// and returns the successor, with no I/O and no hidden mutability, so the
/// full state machine is testable without a UI harness or a store.
#[derive(Debug, Clone)]
pub struct ScreenState {
    schema: CollectionSchema,
    phase: Phase,
    /// Superset of records from the last applied fetch, in creation order.
    records: Vec<Record>,
    /// The slice currently visible: filter then paginate over `records`.
    visible: ListResult,
    filter: FilterState,
    page: PageState,
    error: Option<String>,
    generation: u64,
}

impl ScreenState {
    /// Create an idle state for a collection.
    pub fn new(schema: CollectionSchema) -> Self {
        Self {
            schema,
            phase: Phase::Idle,
            records: Vec::new(),
            visible: ListResult::default(),
            filter: FilterState::default(),
            page: PageState::default(),
            error: None,
            generation: 0,
        }
    }

    /// The schema of the collection this screen lists.
    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// The records visible on the current page.
    pub fn items(&self) -> &[Record] {
        &self.visible.items
    }

    /// Whether a subsequent page exists for the current filters.
    pub fn has_more(&self) -> bool {
        self.visible.has_more
    }

    /// The active filters.
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// The current page position.
    pub fn page(&self) -> &PageState {
        &self.page
    }

    /// The last surfaced error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The generation of the most recently dispatched fetch.
    ///
    /// A [`ScreenEvent::FetchCompleted`] must carry this value to be
    /// applied; completions tagged with an older generation are discarded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply an event, returning the successor state.
    pub fn apply(mut self, event: ScreenEvent) -> Self {
        match event {
            ScreenEvent::FetchStarted => {
                self.generation += 1;
                self.phase = Phase::Loading;
                self
            }

            ScreenEvent::FetchCompleted {
                generation,
                outcome,
            } => {
                if generation != self.generation {
                    // Superseded by a later fetch; ignore entirely.
                    return self;
                }
                match outcome {
                    Ok(records) => {
                        self.records = records;
                        self.error = None;
                        self.phase = Phase::Loaded;
                        self.recompute()
                    }
                    Err(message) => {
                        // The previous page stays visible unchanged.
                        self.error = Some(message);
                        self.phase = Phase::Failed;
                        self
                    }
                }
            }

            ScreenEvent::FilterChanged(filter) => {
                self.filter = filter;
                self.page = self.page.reset();
                self.recompute()
            }

            ScreenEvent::PageChanged(page) => {
                self.page = page;
                self.recompute()
            }

            ScreenEvent::MutationFailed(message) => {
                self.error = Some(message);
                self
            }

            ScreenEvent::Reset => Self::new(self.schema),
        }
    }

    /// Re-derive the visible slice from the cached superset.
    fn recompute(mut self) -> Self {
        match Predicate::build(&self.schema, &self.filter) {
            Ok(predicate) => {
                let filtered: Vec<Record> = self
                    .records
                    .iter()
                    .filter(|r| predicate.matches(r))
                    .cloned()
                    .collect();
                self.visible = paginate(&filtered, &self.page);
                self
            }
            Err(e) => {
                // A filter the schema cannot back is a programmer error;
                // the previous slice is retained.
                self.error = Some(e.to_string());
                self.phase = Phase::Failed;
                self
            }
        }
    }
}
