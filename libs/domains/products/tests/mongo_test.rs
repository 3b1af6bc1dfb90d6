//! MongoDB repository tests against a throwaway container.
//!
//! Run with `cargo test -p domain_products -- --ignored` (needs Docker).

use database::Pagination;
use domain_products::*;
use ::mongodb::bson::oid::ObjectId;
use serde_json::json;
use test_utils::{TestDataBuilder, TestMongo};

fn product(id_category: &str, name: &str, price: f64) -> CreateProduct {
    serde_json::from_value(json!({
        "id_category": id_category,
        "name": name,
        "description": "Mid range phone",
        "stock": 3,
        "price": price,
        "color": "black"
    }))
    .unwrap()
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_product_crud_keeps_created_at() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("product_crud_keeps_created_at");
    let repo = MongoProductRepository::new(&mongo.database("catalog_test"));
    repo.create_indexes().await.unwrap();

    let created = repo
        .create(product(&builder.object_id_hex(), "X1", 199.0))
        .await
        .unwrap();
    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let update: UpdateProduct =
        serde_json::from_value(json!({"stock": 2, "color": "white"})).unwrap();
    repo.update(created.id, update).await.unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.stock.as_i64(), Some(2));
    assert_eq!(fetched.extra.get_str("color").unwrap(), "white");
    assert_eq!(fetched.timestamps.created_at, created.timestamps.created_at);
    assert!(fetched.timestamps.updated_at.is_some());

    repo.delete(created.id).await.unwrap();
    assert!(matches!(
        repo.delete(created.id).await,
        Err(ProductError::NotFound)
    ));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_find_page_filters_and_counts() {
    let mongo = TestMongo::new().await;
    let repo = MongoProductRepository::new(&mongo.database("catalog_test"));
    let category = ObjectId::new().to_hex();
    let other = ObjectId::new().to_hex();

    for (name, price) in [("Alpha", 90.0), ("Beta", 120.0), ("Gamma", 150.0), ("Delta", 210.0)] {
        repo.create(product(&category, name, price)).await.unwrap();
    }
    repo.create(product(&other, "Beta Max", 130.0)).await.unwrap();

    let filter = SearchFilter {
        id_category: Some(category.clone()),
        price_min: Some(100.0),
        price_max: Some(200.0),
        ..Default::default()
    };
    let page = repo
        .find_page(filter, Pagination::new(1, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total_pages, 2);

    let filter = SearchFilter {
        query: Some("beta".to_string()),
        ..Default::default()
    };
    let page = repo
        .find_page(filter, Pagination::new(1, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_unknown_product_is_not_found() {
    let mongo = TestMongo::new().await;
    let repo = MongoProductRepository::new(&mongo.database("catalog_test"));

    let update: UpdateProduct = serde_json::from_value(json!({"name": "Nothing"})).unwrap();
    let result = repo.update(ObjectId::new(), update).await;
    assert!(matches!(result, Err(ProductError::NotFound)));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_find_page_far_past_the_end_is_empty() {
    let mongo = TestMongo::new().await;
    let repo = MongoProductRepository::new(&mongo.database("catalog_test"));
    repo.create(product(&ObjectId::new().to_hex(), "Alpha", 90.0))
        .await
        .unwrap();

    let page = repo
        .find_page(
            SearchFilter::default(),
            Pagination::new(1_000_000_000_000_000_000, 10).unwrap(),
        )
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_fractional_stock_reads_back() {
    let mongo = TestMongo::new().await;
    let repo = MongoProductRepository::new(&mongo.database("catalog_test"));

    let mut input = product(&ObjectId::new().to_hex(), "Cable", 4.5);
    input.stock = serde_json::Number::from_f64(12.5).unwrap();
    let created = repo.create(input).await.unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.stock.as_f64(), Some(12.5));
}
