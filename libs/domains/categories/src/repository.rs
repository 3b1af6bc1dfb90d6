use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::CategoryResult;
use crate::models::{Category, CreateCategory, UpdateCategory};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Persist a new category
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category>;

    async fn get_by_id(&self, id: ObjectId) -> CategoryResult<Option<Category>>;

    /// All categories in storage order
    async fn list(&self) -> CategoryResult<Vec<Category>>;

    /// Merge the supplied fields; `NotFound` when no document matched
    async fn update(&self, id: ObjectId, input: UpdateCategory) -> CategoryResult<()>;

    /// `NotFound` when nothing was deleted
    async fn delete(&self, id: ObjectId) -> CategoryResult<()>;
}
