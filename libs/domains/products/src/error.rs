use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::PaginationError;
use domain_categories::CategoryError;
use thiserror::Error;

use crate::validation::SchemaViolation;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found")]
    NotFound,

    #[error("Category not found")]
    CategoryNotFound,

    /// Path segment that is neither a page number nor an ObjectId
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<CategoryError> for ProductError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound => ProductError::CategoryNotFound,
            CategoryError::Validation(msg) => ProductError::Validation(msg),
            CategoryError::Database(e) => ProductError::Database(e),
            CategoryError::Internal(msg) => ProductError::Internal(msg),
        }
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound => AppError::NotFound("Product not found".to_string()),
            ProductError::CategoryNotFound => {
                AppError::NotFound("Category not found".to_string())
            }
            ProductError::InvalidId(raw) => AppError::InvalidObjectId(raw),
            ProductError::Schema(violation) => AppError::BadRequest(violation.to_string()),
            ProductError::Pagination(e) => AppError::BadRequest(e.to_string()),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Database(e) => AppError::Database(e),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
