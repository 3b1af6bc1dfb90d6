//! Database library providing the MongoDB connector and storage-agnostic helpers
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client, connector and health check
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//! - `all` - All features
//!
//! # Examples
//!
//! ```ignore
//! use database::mongodb;
//!
//! let client = mongodb::connect("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//! ```
//!
//! Pagination is independent of the backend:
//!
//! ```
//! use database::Pagination;
//!
//! let pagination = Pagination::new(2, 10).unwrap();
//! assert_eq!(pagination.offset(), 10);
//! assert_eq!(pagination.total_pages(25), 3);
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{
    DatabaseError, DatabaseResult, Page, Pagination, PaginationError, RetryConfig, retry,
    retry_with_backoff,
};
