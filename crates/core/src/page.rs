use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Largest page size accepted by list operations.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validated one-based offset pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a page request, rejecting a zero page or an out-of-range size.
    pub fn new(page: u32, size: u32) -> AppResult<Self> {
        if page == 0 {
            return Err(AppError::Validation("page must be at least 1".to_owned()));
        }

        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Self { page, size })
    }

    /// Returns the one-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }

    /// Returns the maximum number of rows to return.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// One-based page number.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Total number of pages.
    pub pages: u64,
}

impl<T> Page<T> {
    /// Builds a page from the sliced items and the unpaged total.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            size: request.size(),
            pages: total.div_ceil(request.limit()),
        }
    }

    /// Maps every item, keeping the totals.
    pub fn map<U>(self, transform: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(transform).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
            pages: self.pages,
        }
    }
}
