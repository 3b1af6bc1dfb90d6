//! Utilities shared across database backends

pub mod error;
pub mod pagination;
pub mod retry;

pub use error::{DatabaseError, DatabaseResult};
pub use pagination::{Page, Pagination, PaginationError};
pub use retry::{RetryConfig, retry, retry_with_backoff};
