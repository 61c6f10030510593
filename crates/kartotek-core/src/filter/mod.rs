//! Filter state and predicate construction.
//!
//! A [`FilterState`] captures what the user asked for: a free-text search
//! term, structured key constraints, and a date range. A [`Predicate`] is
//! the compiled form, checked against a collection's schema once and then
//! applied per record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::record::Record;
use crate::schema::CollectionSchema;

/// The active filter constraints for a list screen.
///
/// Absence of a key means no constraint on that key. The state is
/// immutable: the `with_*` methods consume the state and return a new one.
///
/// # Example
///
/// ```
/// use kartotek_core::FilterState;
///
/// let filter = FilterState::default()
///     .with_search("acme")
///     .with_status("active");
///
/// assert_eq!(filter.search(), Some("acme"));
/// assert!(filter.category().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<NaiveDate>,
}

impl FilterState {
    /// Returns a new state with the given free-text search term.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Returns a new state with the given status constraint.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Returns a new state with the given category constraint.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns a new state with the given inclusive start date.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Returns a new state with the given inclusive end date.
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// The free-text search term, if any.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// The status constraint, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The category constraint, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The inclusive start of the date range, if any.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// The inclusive end of the date range, if any.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Returns true if no key is constrained.
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.status.is_none()
            && self.category.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// A compiled filter, ready to apply to records of one collection.
///
/// Built from a [`FilterState`] and the collection's schema; construction
/// fails if the filter constrains a key the schema does not back. All
/// active constraints are combined with logical AND. An empty filter
/// accepts every record.
#[derive(Debug, Clone)]
pub struct Predicate {
    search: Option<(String, Vec<String>)>,
    status: Option<(String, String)>,
    category: Option<(String, String)>,
    date: Option<(String, Option<NaiveDate>, Option<NaiveDate>)>,
}

impl Predicate {
    /// Compile a filter against a collection schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuery`](crate::error::StoreError) if the
    /// filter constrains a key the schema does not back.
    pub fn build(schema: &CollectionSchema, filter: &FilterState) -> Result<Self, Error> {
        schema.validate_filter(filter)?;

        let search = filter
            .search()
            .map(|term| (term.to_lowercase(), schema.search_fields.clone()));

        // Safe: validate_filter guarantees the backing fields exist.
        let status = filter
            .status()
            .map(|v| (schema.status_field.clone().unwrap(), v.to_string()));

        let category = filter
            .category()
            .map(|v| (schema.category_field.clone().unwrap(), v.to_string()));

        let date = if filter.start_date().is_some() || filter.end_date().is_some() {
            Some((
                schema.date_field.clone().unwrap(),
                filter.start_date(),
                filter.end_date(),
            ))
        } else {
            None
        };

        Ok(Self {
            search,
            status,
            category,
            date,
        })
    }

    /// Test a record against the compiled constraints.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some((term, fields)) = &self.search {
            let hit = fields.iter().any(|field| {
                record
                    .field_str(field)
                    .is_some_and(|v| v.to_lowercase().contains(term.as_str()))
            });
            if !hit {
                return false;
            }
        }

        if let Some((field, expected)) = &self.status {
            if record.field_str(field) != Some(expected.as_str()) {
                return false;
            }
        }

        if let Some((field, expected)) = &self.category {
            if record.field_str(field) != Some(expected.as_str()) {
                return false;
            }
        }

        if let Some((field, start, end)) = &self.date {
            let Some(date) = record.field_str(field).and_then(parse_reference_date) else {
                // A record without a parseable reference date cannot fall
                // inside any range.
                return false;
            };
            if start.is_some_and(|s| date < s) {
                return false;
            }
            if end.is_some_and(|e| date > e) {
                return false;
            }
        }

        true
    }

    /// Apply the predicate to a list, preserving relative order.
    pub fn filter(&self, records: Vec<Record>) -> Vec<Record> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Parse a record's reference date field.
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates.
fn parse_reference_date(value: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = value.parse::<DateTime<Utc>>() {
        return Some(timestamp.date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
