//! Pagination types and arithmetic

use serde::{Deserialize, Serialize};

/// A page request (1-indexed).
///
/// `size: None` means the engine's configured default page size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    /// Page number, starting at 1. Values below 1 clamp to 1; values past
    /// the last page clamp to the last page.
    pub number: usize,

    /// Results per page, or `None` for the configured default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: None,
        }
    }
}

impl Page {
    pub fn new(number: usize) -> Self {
        Self { number, size: None }
    }

    /// First page at the default size.
    pub fn first() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }
}

/// Number of pages needed to list `cardinality` members at `page_size` per
/// page. A zero page size is treated as 1.
pub fn total_pages(cardinality: usize, page_size: usize) -> usize {
    cardinality.div_ceil(page_size.max(1))
}

/// Resolve a page request into inclusive `[start, stop]` range bounds.
///
/// The page number is clamped into `1..=total_pages`; for an empty
/// collection it resolves to page 0, which produces a range the store
/// answers with an empty sequence.
pub fn page_bounds(cardinality: usize, number: usize, page_size: usize) -> (usize, usize) {
    let size = page_size.max(1);
    let number = number.max(1).min(total_pages(cardinality, size));
    let start = number.saturating_sub(1) * size;
    (start, start + size - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 25), 0);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(25, 5), 5);
    }

    #[test]
    fn test_zero_page_size_clamps_to_one() {
        assert_eq!(total_pages(3, 0), 3);
        assert_eq!(page_bounds(3, 2, 0), (1, 1));
    }

    #[test]
    fn test_page_bounds_basic() {
        assert_eq!(page_bounds(30, 1, 10), (0, 9));
        assert_eq!(page_bounds(30, 2, 10), (10, 19));
        assert_eq!(page_bounds(30, 3, 10), (20, 29));
    }

    #[test]
    fn test_page_past_end_clamps_to_last_page() {
        assert_eq!(page_bounds(30, 4, 10), (20, 29));
        assert_eq!(page_bounds(2, 5, 25), (0, 24));
    }

    #[test]
    fn test_page_below_one_clamps_to_first() {
        assert_eq!(page_bounds(30, 0, 10), (0, 9));
    }

    #[test]
    fn test_empty_collection_resolves_to_empty_range() {
        // Page 0 of an empty collection: the range starts at 0 and the
        // store returns nothing for it.
        assert_eq!(page_bounds(0, 1, 25), (0, 24));
        assert_eq!(page_bounds(0, 7, 25), (0, 24));
    }

    #[test]
    fn test_page_default() {
        let page = Page::default();
        assert_eq!(page.number, 1);
        assert_eq!(page.size, None);
        assert_eq!(Page::new(3).with_size(10).size, Some(10));
    }
}
