//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use database::{Page, Pagination};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId, to_bson},
};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, Product, SearchFilter, UpdateProduct, json_to_bson, number_to_bson,
};
use crate::repository::ProductRepository;

pub const DEFAULT_COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Product>(collection_name),
        }
    }

    /// Indexes backing the search filters
    pub async fn create_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "id_category": 1 }).build(),
            IndexModel::builder().keys(doc! { "price": 1 }).build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    fn build_filter(filter: &SearchFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref id_category) = filter.id_category {
            if !id_category.is_empty() {
                doc.insert("id_category", id_category.as_str());
            }
        }

        if let Some(ref query) = filter.query {
            if !query.is_empty() {
                let pattern = regex::escape(query);
                doc.insert(
                    "$or",
                    vec![
                        doc! { "name": { "$regex": pattern.as_str(), "$options": "i" } },
                        doc! { "description": { "$regex": pattern.as_str(), "$options": "i" } },
                    ],
                );
            }
        }

        let mut price = doc! {};
        if let Some(min) = filter.price_min {
            price.insert("$gte", min);
        }
        if let Some(max) = filter.price_max {
            price.insert("$lte", max);
        }
        if !price.is_empty() {
            doc.insert("price", price);
        }

        doc
    }

    /// `$set` document for a partial update.
    ///
    /// Only `timestamps.updated_at` is written so `created_at` survives.
    fn build_update(input: &UpdateProduct) -> ProductResult<Document> {
        let mut set = doc! {};

        if let Some(ref id_category) = input.id_category {
            set.insert("id_category", id_category.as_str());
        }
        if let Some(ref name) = input.name {
            set.insert("name", name.as_str());
        }
        if let Some(ref description) = input.description {
            set.insert("description", description.as_str());
        }
        if let Some(ref stock) = input.stock {
            set.insert("stock", number_to_bson(stock)?);
        }
        if let Some(price) = input.price {
            set.insert("price", price);
        }
        for (key, value) in &input.extra {
            set.insert(key.as_str(), json_to_bson(value)?);
        }

        let now = to_bson(&Utc::now()).map_err(|e| ProductError::Internal(e.to_string()))?;
        set.insert("timestamps.updated_at", now);

        Ok(doc! { "$set": set })
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name, id_category = %input.id_category))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input)?;

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_page(
        &self,
        filter: SearchFilter,
        pagination: Pagination,
    ) -> ProductResult<Page<Product>> {
        let mongo_filter = Self::build_filter(&filter);
        let total = self.collection.count_documents(mongo_filter.clone()).await?;

        // Pages past the last match are empty; the driver also rejects a
        // skip above i64::MAX.
        let skip = match pagination.skip() {
            Some(skip) if skip < total => skip,
            _ => return Ok(Page::new(Vec::new(), total, &pagination)),
        };

        let options = mongodb::options::FindOptions::builder()
            .skip(skip)
            .limit(pagination.limit())
            .build();

        let cursor = self
            .collection
            .find(mongo_filter)
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(Page::new(products, total, &pagination))
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<()> {
        let update = Self::build_update(&input)?;
        let result = self.collection.update_one(doc! { "_id": id }, update).await?;

        if result.matched_count == 0 {
            return Err(ProductError::NotFound);
        }

        tracing::info!(product_id = %id, "Product updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ProductResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(ProductError::NotFound);
        }

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_filter_empty() {
        let doc = MongoProductRepository::build_filter(&SearchFilter::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_with_category_and_price_range() {
        let filter = SearchFilter {
            id_category: Some("6650f1c2a4b9e3d2c1a0b9f8".to_string()),
            price_min: Some(100.0),
            price_max: Some(200.0),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);

        assert_eq!(doc.get_str("id_category").unwrap(), "6650f1c2a4b9e3d2c1a0b9f8");
        let price = doc.get_document("price").unwrap();
        assert_eq!(price.get_f64("$gte").unwrap(), 100.0);
        assert_eq!(price.get_f64("$lte").unwrap(), 200.0);
        assert!(!doc.contains_key("$or"));
    }

    #[test]
    fn test_build_filter_only_max_price() {
        let filter = SearchFilter {
            price_max: Some(50.0),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        let price = doc.get_document("price").unwrap();
        assert!(!price.contains_key("$gte"));
        assert_eq!(price.get_f64("$lte").unwrap(), 50.0);
    }

    #[test]
    fn test_build_filter_escapes_query() {
        let filter = SearchFilter {
            query: Some("x1.5 (pro)".to_string()),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        let or = doc.get_array("$or").unwrap();
        assert_eq!(or.len(), 2);

        let name = or[0].as_document().unwrap().get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"x1\.5 \(pro\)");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_build_filter_ignores_empty_strings() {
        let filter = SearchFilter {
            id_category: Some(String::new()),
            query: Some(String::new()),
            ..Default::default()
        };
        assert!(MongoProductRepository::build_filter(&filter).is_empty());
    }

    #[test]
    fn test_build_update_keeps_created_at() {
        let input: UpdateProduct =
            serde_json::from_value(json!({"price": 249.5, "color": "blue"})).unwrap();
        let update = MongoProductRepository::build_update(&input).unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_f64("price").unwrap(), 249.5);
        assert_eq!(set.get_str("color").unwrap(), "blue");
        assert!(set.contains_key("timestamps.updated_at"));
        assert!(!set.contains_key("timestamps"));
        assert!(!set.contains_key("name"));
    }
}
