//! Fixed-size, 1-based page arithmetic shared by paginated listings.

use serde::Serialize;

/// Error returned when a page request cannot be turned into a window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("Page numbers start at 1, got {0}")]
    InvalidPage(u64),

    #[error("Page size must be greater than zero")]
    InvalidPageSize,
}

/// A validated page request: 1-based page number plus the fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    page_size: u64,
}

impl Pagination {
    pub fn new(page: u64, page_size: u64) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::InvalidPageSize);
        }
        if page == 0 {
            return Err(PaginationError::InvalidPage(page));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of documents to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// [`offset`](Self::offset) as the driver's signed skip.
    ///
    /// `None` when the page starts beyond `i64::MAX` documents, where no
    /// collection can have anything to return.
    pub fn skip(&self) -> Option<u64> {
        let offset = self.offset();
        i64::try_from(offset).ok().map(|_| offset)
    }

    /// Maximum number of documents on this page, as the driver expects it.
    pub fn limit(&self) -> i64 {
        i64::try_from(self.page_size).unwrap_or(i64::MAX)
    }

    /// `ceil(total / page_size)`; zero when nothing matches.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size)
    }
}

/// One page of results together with the page count of the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total_pages: pagination.total_pages(total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
        }
    }
}
