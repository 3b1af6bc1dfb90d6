//! Products Domain
//!
//! Every product belongs to a category and carries, next to its base
//! attributes (`id_category`, `name`, `description`, `stock`, `price`),
//! exactly the additional fields that category declares. The check runs on
//! create only; partial updates are merged as sent.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────────────────┐
//! │   Service   │────►│ CategoryRepository   │  ← schema lookup
//! └──────┬──────┘     └──────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs, response views
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_categories::{CategoryService, MongoCategoryRepository};
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let categories = CategoryService::new(MongoCategoryRepository::new(&db));
//! let products = ProductService::new(
//!     MongoProductRepository::new(&db),
//!     categories.repository(),
//!     10,
//! );
//! let router = handlers::router(products);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateProduct, IMMUTABLE_KEYS, Product, ProductCreated, ProductKey, ProductPage,
    ProductResponse, SearchFilter, Timestamps, UpdateProduct,
};
pub use crate::mongodb::MongoProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
pub use validation::{CategorySchema, SchemaViolation};
