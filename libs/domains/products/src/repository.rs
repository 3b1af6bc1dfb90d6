use async_trait::async_trait;
use database::{Page, Pagination};
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, SearchFilter, UpdateProduct};

/// Repository trait for Product persistence.
///
/// Schema checks happen in the service; implementations store what they get.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// One page of the products matching `filter`, in storage order
    async fn find_page(
        &self,
        filter: SearchFilter,
        pagination: Pagination,
    ) -> ProductResult<Page<Product>>;

    /// Merge the supplied fields and stamp `timestamps.updated_at`;
    /// `NotFound` when no document matched
    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<()>;

    async fn delete(&self, id: ObjectId) -> ProductResult<()>;
}
