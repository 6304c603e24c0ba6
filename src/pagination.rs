//! Fixed-size pagination for the catalog pages.
//!
//! Pages are 1-indexed and five records long. Requests for pages past the
//! end are not an error; they simply produce an empty window.

/// Records shown per page.
pub const PAGE_SIZE: i64 = 5;

/// Offset of the first record on a 1-based page. Saturates at the
/// integer limit so huge page numbers stay past the end instead of
/// wrapping negative.
pub fn offset(page: i64) -> i64 {
    page.saturating_mul(PAGE_SIZE).saturating_sub(PAGE_SIZE)
}

/// Number of pages needed for `total` records.
pub fn page_count(total: i64) -> i64 {
    (total + PAGE_SIZE - 1) / PAGE_SIZE
}

/// View model for the row of page links under a listing.
#[derive(Debug, Clone)]
pub struct Pager {
    base: String,
    pub current: i64,
    pub page_count: i64,
}

impl Pager {
    /// `base` is the path up to (not including) the `/page/N` suffix,
    /// e.g. `/books/allbooks` or `/books/search/twain`.
    pub fn new(base: impl Into<String>, current: i64, total: i64) -> Self {
        Self {
            base: base.into(),
            current,
            page_count: page_count(total),
        }
    }

    pub fn page_numbers(&self) -> std::ops::RangeInclusive<i64> {
        1..=self.page_count
    }

    pub fn href(&self, page: i64) -> String {
        format!("{}/page/{}", self.base, page)
    }

    pub fn is_current(&self, page: i64) -> bool {
        page == self.current
    }
}
