//! Product Service - Business logic layer

use database::{Page, Pagination};
use domain_categories::CategoryRepository;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, SearchFilter, UpdateProduct};
use crate::repository::ProductRepository;
use crate::validation::CategorySchema;

/// Product service: checks payloads against their category before
/// delegating to the repository
pub struct ProductService<P: ProductRepository, C: CategoryRepository> {
    repository: Arc<P>,
    categories: Arc<C>,
    page_size: u64,
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    pub fn new(repository: P, categories: Arc<C>, page_size: u64) -> Self {
        Self {
            repository: Arc::new(repository),
            categories,
            page_size,
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Schema of the category a product claims to belong to.
    ///
    /// A reference that is not an ObjectId cannot name a stored category and
    /// is reported the same way as an unknown one.
    async fn category_schema(&self, id_category: &str) -> ProductResult<CategorySchema> {
        let id = ObjectId::parse_str(id_category).map_err(|_| ProductError::CategoryNotFound)?;

        let category = self
            .categories
            .get_by_id(id)
            .await?
            .ok_or(ProductError::CategoryNotFound)?;

        Ok(CategorySchema::from(&category))
    }

    #[instrument(skip(self, input), fields(product_name = %input.name, id_category = %input.id_category))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let schema = self.category_schema(&input.id_category).await?;
        schema.check(input.extra.keys().map(String::as_str))?;

        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ObjectId) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, page: u64) -> ProductResult<Page<Product>> {
        self.search_products(page, SearchFilter::default()).await
    }

    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        page: u64,
        filter: SearchFilter,
    ) -> ProductResult<Page<Product>> {
        let pagination = Pagination::new(page, self.page_size)?;
        self.repository.find_page(filter, pagination).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<()> {
        if input.is_empty() {
            return Err(ProductError::Validation("No data provided".to_string()));
        }
        input.check_keys()?;
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ObjectId) -> ProductResult<()> {
        self.repository.delete(id).await
    }
}

impl<P: ProductRepository, C: CategoryRepository> Clone for ProductService<P, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            categories: Arc::clone(&self.categories),
            page_size: self.page_size,
        }
    }
}
