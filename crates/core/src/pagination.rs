//! Page-number pagination
//!
//! Pure windowing math for the catalog list view. A page request is always
//! normalized to a valid 1-indexed page; pages past the end are not an error
//! and simply produce an empty window.

use serde::Serialize;
use std::num::IntErrorKind;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Normalize a raw `page` query value
///
/// Missing, non-numeric, and non-positive values all become page 1. Positive
/// numbers too large for `u64` saturate, which lands past the end.
pub fn normalize_page(raw: Option<&str>) -> u64 {
    let Some(value) = raw.map(str::trim) else {
        return 1;
    };
    match value.parse::<u64>() {
        Ok(page) => page.max(1),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
        Err(_) => 1,
    }
}

/// Number of pages needed for `total_items`, zero when there are none
pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// A normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Build a request, clamping the page to at least 1
    ///
    /// `page_size` must be positive; a zero page size is treated as 1.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Build a request from the raw `page` query value
    pub fn from_query(raw: Option<&str>, page_size: u64) -> Self {
        Self::new(normalize_page(raw), page_size)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Skip/limit window for this page
    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: (self.page - 1).saturating_mul(self.page_size),
            limit: self.page_size,
        }
    }
}

/// Offset and limit into the naturally ordered matching set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Index range this window covers within a sequence of `len` items
    ///
    /// Windows starting past the end yield an empty range.
    pub fn bounds(&self, len: usize) -> std::ops::Range<usize> {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX).min(len);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        let end = start.saturating_add(limit).min(len);
        start..end
    }
}

/// One page of results plus the metadata the list view needs
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_matching: u64,
    pub total_pages: u64,
    /// Every category in the collection, independent of the active filter
    pub categories: Vec<String>,
}

impl<T> PageResult<T> {
    pub fn new(
        items: Vec<T>,
        request: PageRequest,
        total_matching: u64,
        categories: Vec<String>,
    ) -> Self {
        Self {
            items,
            page: request.page(),
            page_size: request.page_size(),
            total_matching,
            total_pages: total_pages(total_matching, request.page_size()),
            categories,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-indexed position of the first item on this page
    pub fn first_position(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // normalize_page tests
    // ============================================================================

    #[test]
    fn test_normalize_page_valid() {
        assert_eq!(normalize_page(Some("1")), 1);
        assert_eq!(normalize_page(Some("7")), 7);
        assert_eq!(normalize_page(Some(" 3 ")), 3);
    }

    #[test]
    fn test_normalize_page_missing() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some("")), 1);
    }

    #[test]
    fn test_normalize_page_non_positive() {
        assert_eq!(normalize_page(Some("0")), 1);
        assert_eq!(normalize_page(Some("-4")), 1);
        assert_eq!(normalize_page(Some(&i64::MIN.to_string())), 1);
    }

    #[test]
    fn test_normalize_page_non_numeric() {
        assert_eq!(normalize_page(Some("abc")), 1);
        assert_eq!(normalize_page(Some("2.5")), 1);
        assert_eq!(normalize_page(Some("7abc")), 1);
    }

    #[test]
    fn test_normalize_page_overflow_saturates() {
        assert_eq!(normalize_page(Some("99999999999999999999999")), u64::MAX);
        assert_eq!(normalize_page(Some(&u64::MAX.to_string())), u64::MAX);
        assert_eq!(normalize_page(Some("+5")), 5);
        assert_eq!(normalize_page(Some("-99999999999999999999999")), 1);

        let window = PageRequest::from_query(Some("99999999999999999999"), 20).window();
        assert_eq!(window.offset, u64::MAX);
        assert!(window.bounds(45).is_empty());
    }

    // ============================================================================
    // total_pages tests
    // ============================================================================

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(45, 20), 3);
    }

    #[test]
    fn test_total_pages_zero_iff_no_items() {
        for total in 0..100 {
            assert_eq!(total_pages(total, 20) == 0, total == 0);
        }
    }

    // ============================================================================
    // PageRequest / PageWindow tests
    // ============================================================================

    #[test]
    fn test_window_offsets() {
        assert_eq!(
            PageRequest::new(1, 20).window(),
            PageWindow { offset: 0, limit: 20 }
        );
        assert_eq!(
            PageRequest::new(3, 20).window(),
            PageWindow { offset: 40, limit: 20 }
        );
    }

    #[test]
    fn test_request_clamps_page_and_size() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), 1);
    }

    #[test]
    fn test_from_query() {
        let request = PageRequest::from_query(Some("nope"), DEFAULT_PAGE_SIZE);
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), 20);
    }

    #[test]
    fn test_window_saturates_on_huge_page() {
        let window = PageRequest::new(u64::MAX, 20).window();
        assert_eq!(window.offset, u64::MAX);
        assert_eq!(window.bounds(45), 45..45);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(PageRequest::new(1, 20).window().bounds(45), 0..20);
        assert_eq!(PageRequest::new(3, 20).window().bounds(45), 40..45);
        assert_eq!(PageRequest::new(4, 20).window().bounds(45), 45..45);
        assert_eq!(PageRequest::new(1, 20).window().bounds(0), 0..0);
    }

    #[test]
    fn test_full_pages_until_the_last() {
        let total = 45usize;
        for page in 1..=5u64 {
            let range = PageRequest::new(page, 20).window().bounds(total);
            let remaining = total as i64 - ((page as i64 - 1) * 20);
            if remaining >= 20 {
                assert_eq!(range.len(), 20);
            } else {
                assert_eq!(range.len(), remaining.max(0) as usize);
            }
        }
    }

    // ============================================================================
    // PageResult tests
    // ============================================================================

    #[test]
    fn test_page_result_navigation() {
        let result = PageResult::new(vec![1, 2], PageRequest::new(2, 2), 5, vec![]);
        assert_eq!(result.total_pages, 3);
        assert!(result.has_previous());
        assert!(result.has_next());
        assert_eq!(result.first_position(), 3);

        let last = PageResult::new(vec![5], PageRequest::new(3, 2), 5, vec![]);
        assert!(!last.has_next());
    }

    #[test]
    fn test_page_result_past_the_end() {
        let result: PageResult<u8> = PageResult::new(vec![], PageRequest::new(9, 20), 20, vec![]);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.page, 9);
        assert!(!result.has_next());
        assert!(result.has_previous());
    }

    #[test]
    fn test_page_result_empty_store() {
        let result: PageResult<u8> = PageResult::new(vec![], PageRequest::new(1, 20), 0, vec![]);
        assert_eq!(result.total_pages, 0);
        assert!(!result.has_previous());
        assert!(!result.has_next());
    }
}
