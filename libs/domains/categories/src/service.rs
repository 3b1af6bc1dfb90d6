//! Category Service - Business logic layer

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CreateCategory, UpdateCategory, validate_field_names};
use crate::repository::CategoryRepository;

/// Category service: validates input and delegates to the repository
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Shared handle to the repository, e.g. for schema lookups elsewhere
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    #[instrument(skip(self, input), fields(category_name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;
        validate_field_names(&input.fields)?;

        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: ObjectId) -> CategoryResult<Category> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> CategoryResult<Vec<Category>> {
        self.repository.list().await
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(&self, id: ObjectId, input: UpdateCategory) -> CategoryResult<()> {
        if input.is_empty() {
            return Err(CategoryError::Validation("No data provided".to_string()));
        }
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;
        if let Some(ref fields) = input.fields {
            validate_field_names(fields)?;
        }

        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: ObjectId) -> CategoryResult<()> {
        self.repository.delete(id).await
    }
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
