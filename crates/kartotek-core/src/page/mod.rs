//! Pagination over ordered record lists.

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};
use crate::record::Record;

/// Default page size used by [`PageState::first`].
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// The current page position of a list screen.
///
/// `page_number` is 1-based. A page state is an immutable value:
/// [`next`](PageState::next) and [`previous`](PageState::previous) return
/// new states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    page_number: usize,
    page_size: usize,
}

impl PageState {
    /// Create a page state, validating both values.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_number` or `page_size` is zero.
    pub fn new(page_number: usize, page_size: usize) -> Result<Self, Error> {
        if page_number == 0 {
            return Err(InvalidInputError::Page {
                reason: "page number must be at least 1".to_string(),
            }
            .into());
        }
        if page_size == 0 {
            return Err(InvalidInputError::Page {
                reason: "page size must be at least 1".to_string(),
            }
            .into());
        }
        Ok(Self {
            page_number,
            page_size,
        })
    }

    /// The first page with the given page size.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_size` is zero.
    pub fn first(page_size: usize) -> Result<Self, Error> {
        Self::new(1, page_size)
    }

    /// The 1-based page number.
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// The number of items per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page_number - 1) * self.page_size
    }

    /// The following page.
    pub fn next(&self) -> Self {
        Self {
            page_number: self.page_number + 1,
            page_size: self.page_size,
        }
    }

    /// The preceding page, saturating at page 1.
    pub fn previous(&self) -> Self {
        Self {
            page_number: self.page_number.saturating_sub(1).max(1),
            page_size: self.page_size,
        }
    }

    /// This page position reset to page 1.
    pub fn reset(&self) -> Self {
        Self {
            page_number: 1,
            page_size: self.page_size,
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of records, plus whether a subsequent page exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult {
    /// The records on this page, in their original relative order.
    pub items: Vec<Record>,

    /// Whether a subsequent page exists.
    pub has_more: bool,
}

/// Slice an ordered list into the requested page.
///
/// Returns the slice `[(n-1)*size, n*size)` and sets `has_more` when items
/// remain beyond it. Requesting a page past the end of the list yields an
/// empty page with `has_more = false`, never an error.
pub fn paginate(items: &[Record], page: &PageState) -> ListResult {
    let start = page.offset();
    let end = start + page.page_size();

    let slice = if start >= items.len() {
        Vec::new()
    } else {
        items[start..items.len().min(end)].to_vec()
    };

    ListResult {
        has_more: items.len() > end,
        items: slice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordFields;
    use crate::types::RecordId;
    use serde_json::json;

    fn records(count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| Record {
                id: RecordId::new(format!("r{:03}", i)).unwrap(),
                created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                updated_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                fields: RecordFields::new(json!({ "seq": i })).unwrap(),
            })
            .collect()
    }

    #[test]
    fn rejects_zero_page_number() {
        assert!(PageState::new(0, 10).is_err());
    }

    #[test]
    fn rejects_zero_page_size() {
        assert!(PageState::new(1, 0).is_err());
    }

    #[test]
    fn twenty_five_records_page_size_ten() {
        let all = records(25);

        let page1 = paginate(&all, &PageState::new(1, 10).unwrap());
        assert_eq!(page1.items.len(), 10);
        assert!(page1.has_more);
        assert_eq!(page1.items[0].id.as_str(), "r000");

        let page3 = paginate(&all, &PageState::new(3, 10).unwrap());
        assert_eq!(page3.items.len(), 5);
        assert!(!page3.has_more);
        assert_eq!(page3.items[0].id.as_str(), "r020");

        let page4 = paginate(&all, &PageState::new(4, 10).unwrap());
        assert!(page4.items.is_empty());
        assert!(!page4.has_more);
    }

    #[test]
    fn exact_multiple_has_no_phantom_page() {
        let all = records(20);
        let page2 = paginate(&all, &PageState::new(2, 10).unwrap());
        assert_eq!(page2.items.len(), 10);
        assert!(!page2.has_more);
    }

    #[test]
    fn empty_list_yields_empty_first_page() {
        let result = paginate(&[], &PageState::default());
        assert!(result.items.is_empty());
        assert!(!result.has_more);
    }

    #[test]
    fn far_out_of_range_page_is_empty_not_error() {
        let all = records(3);
        let result = paginate(&all, &PageState::new(1000, 10).unwrap());
        assert!(result.items.is_empty());
        assert!(!result.has_more);
    }

    #[test]
    fn next_previous_reset() {
        let page = PageState::new(2, 10).unwrap();
        assert_eq!(page.next().page_number(), 3);
        assert_eq!(page.previous().page_number(), 1);
        assert_eq!(page.previous().previous().page_number(), 1);
        assert_eq!(page.next().reset().page_number(), 1);
        assert_eq!(page.offset(), 10);
    }
}
