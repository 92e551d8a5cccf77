//! Pagination and list-filter primitives.
//!
//! Every list endpoint of the backend uses the same `page`/`page_size`
//! envelope and the same small set of equality/substring filters, so the
//! types live here rather than per feature.

use serde::{Deserialize, Serialize};

/// A page request (1-based page index).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    pub fn next(&self) -> Self {
        Self::new(self.page + 1, self.page_size)
    }

    pub fn previous(&self) -> Self {
        Self::new(self.page.saturating_sub(1), self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 25)
    }
}

/// A paginated result set as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Paginated<T> {
    pub fn total_pages(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size.max(1))) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// Equality/substring filters accepted by the backend list endpoints.
///
/// `name` and `email` are substring matches; the rest are equality matches.
/// Empty/None fields are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
    pub event: Option<String>,
    pub module: Option<String>,
}

impl ListFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.active.is_none()
            && self.event.is_none()
            && self.module.is_none()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Render the filter as query pairs, omitting unset fields.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(email) = &self.email {
            pairs.push(("email", email.clone()));
        }
        if let Some(active) = self.active {
            pairs.push(("active", active.to_string()));
        }
        if let Some(event) = &self.event {
            pairs.push(("event", event.clone()));
        }
        if let Some(module) = &self.module {
            pairs.push(("module", module.clone()));
        }
        pairs
    }
}
