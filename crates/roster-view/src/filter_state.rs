//! Filter state holder for a list screen.

use roster_model::{PageSize, SortSpec, StatusFilter};

/// Search term, status filter, optional sort and pagination cursor.
///
/// Changing anything that alters the matched set (search, status, sort,
/// page size) moves the cursor back to the first page. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState<S> {
    search_term: String,
    status: StatusFilter<S>,
    sort: Option<SortSpec>,
    page: usize,
    page_size: PageSize,
}

impl<S> Default for FilterState<S> {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status: StatusFilter::All,
            sort: None,
            page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl<S: Copy + Eq> FilterState<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn status(&self) -> StatusFilter<S> {
        self.status
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
    }

    pub fn set_status_filter(&mut self, status: StatusFilter<S>) {
        self.status = status;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.page = 1;
    }

    /// Move to `page`, clamped into `1..=page_count`.
    ///
    /// Returns `true` when the cursor actually moved.
    pub fn set_page(&mut self, page: usize, page_count: usize) -> bool {
        let target = page.clamp(1, page_count.max(1));
        let moved = target != self.page;
        self.page = target;
        moved
    }

    /// Re-clamp the cursor after the matched set changed underneath it,
    /// e.g. after a re-fetch removed rows.
    pub fn clamp_page(&mut self, page_count: usize) {
        self.page = self.page.clamp(1, page_count.max(1));
    }
}
