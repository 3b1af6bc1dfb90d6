//! MongoDB implementation of CategoryRepository

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId, to_bson},
};
use tracing::instrument;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;

pub const DEFAULT_COLLECTION: &str = "categories";

/// MongoDB implementation of the CategoryRepository
#[derive(Clone)]
pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    /// ```ignore
    /// let db = client.database("catalog");
    /// let repo = MongoCategoryRepository::new(&db);
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Category>(collection_name),
        }
    }

    /// Index on `name` for lookups by name.
    pub async fn create_indexes(&self) -> CategoryResult<()> {
        let index = IndexModel::builder().keys(doc! { "name": 1 }).build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    /// `$set` document for a partial update, stamping `updated_at`.
    fn build_update(input: &UpdateCategory) -> CategoryResult<Document> {
        let mut set = doc! {};

        if let Some(ref name) = input.name {
            set.insert("name", name.as_str());
        }
        if let Some(ref description) = input.description {
            set.insert("description", description.as_str());
        }
        if let Some(ref fields) = input.fields {
            set.insert("fields", fields.clone());
        }

        let now = to_bson(&Utc::now()).map_err(|e| CategoryError::Internal(e.to_string()))?;
        set.insert("updated_at", now);

        Ok(doc! { "$set": set })
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self, input), fields(category_name = %input.name))]
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let category = Category::new(input);

        self.collection.insert_one(&category).await?;

        tracing::info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> CategoryResult<Option<Category>> {
        let category = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> CategoryResult<Vec<Category>> {
        let cursor = self.collection.find(doc! {}).await?;
        let categories: Vec<Category> = cursor.try_collect().await?;
        Ok(categories)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateCategory) -> CategoryResult<()> {
        let update = Self::build_update(&input)?;
        let result = self.collection.update_one(doc! { "_id": id }, update).await?;

        if result.matched_count == 0 {
            return Err(CategoryError::NotFound);
        }

        tracing::info!(category_id = %id, "Category updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> CategoryResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(CategoryError::NotFound);
        }

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
