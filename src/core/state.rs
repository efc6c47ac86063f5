//! Browse state: filter, sort and pagination cursor
//!
//! Pure, synchronous transitions. Each transition reports whether the
//! visible page is now stale and has to be fetched again; fetching is the
//! product store's job.

use crate::core::filter::FilterSpec;
use crate::core::query::ListQuery;
use crate::core::sort::{SortColumn, SortSpec};
use crate::entities::ProductPage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    filter: FilterSpec,
    sort: SortSpec,
    page: usize,
    page_size: usize,
    total_pages: usize,
    total_items: u64,
}

impl BrowseState {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: FilterSpec::default(),
            sort: SortSpec::default(),
            page: 0,
            page_size: page_size.max(1),
            total_pages: 0,
            total_items: 0,
        }
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Replace the filter and go back to the first page
    pub fn apply_filters(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.page = 0;
    }

    /// Cycle a column's sort direction and go back to the first page
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort.toggle(column);
        self.page = 0;
    }

    /// Replace the whole sort spec and go back to the first page
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.page = 0;
    }

    /// Clear filter and sort, back to the first page
    pub fn reset_filters(&mut self) {
        self.filter = FilterSpec::default();
        self.sort.clear();
        self.page = 0;
    }

    /// Move to page `n`; rejected when `n` is past the last known page.
    /// Returns whether the cursor moved.
    pub fn set_page(&mut self, n: usize) -> bool {
        if n >= self.total_pages {
            return false;
        }
        self.page = n;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(n) => self.set_page(n),
            None => false,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// Request for the page described by the current state
    pub fn query(&self) -> ListQuery {
        ListQuery {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            page: self.page,
            size: self.page_size,
        }
    }

    /// Record page counts from a service response.
    ///
    /// Returns true when the cursor sits past the new last page and was
    /// clamped, meaning the content must be fetched again.
    pub fn record_page(&mut self, page: &ProductPage) -> bool {
        self.total_pages = page.total_pages;
        self.total_items = page.total_items;

        let last = self.total_pages.saturating_sub(1);
        if self.page > last {
            self.page = last;
            return true;
        }
        false
    }
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new(10)
    }
}
