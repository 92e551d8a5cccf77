//! Explicit list-state containers.
//!
//! Each table screen owns one `ListState` holding the fetched items, the
//! page cursor, and the active filter. Containers are created by the
//! caller and passed by reference; there are no ambient singletons.

use warden_core::{ListFilter, PageRequest, Paginated};

/// State of one paginated, filterable table.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    total: u64,
    page: PageRequest,
    filter: ListFilter,
}

impl<T> ListState<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: PageRequest::first(page_size),
            filter: ListFilter::default(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    /// Replace the filter and rewind to the first page.
    pub fn set_filter(&mut self, filter: ListFilter) {
        self.filter = filter;
        self.page = PageRequest::first(self.page.page_size);
    }

    /// Absorb a fetched page; the page cursor follows what the backend
    /// actually returned.
    pub fn apply(&mut self, fetched: Paginated<T>) {
        self.total = fetched.total;
        self.page = PageRequest::new(fetched.page, fetched.page_size);
        self.items = fetched.items;
    }

    pub fn total_pages(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page.page_size.max(1))) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page.page < self.total_pages()
    }

    /// Advance the cursor; the caller re-fetches with `page()`.
    pub fn next_page(&mut self) {
        if self.has_next() {
            self.page = self.page.next();
        }
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.previous();
    }
}
