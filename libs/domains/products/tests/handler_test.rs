//! Handler tests for the Products domain
//!
//! Products and categories live in in-memory repositories; the router is
//! driven with `oneshot`.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use database::{Page, Pagination};
use domain_categories::{
    Category, CategoryError, CategoryRepository, CategoryResult, CreateCategory, UpdateCategory,
};
use domain_products::*;
use http_body_util::BodyExt;
use ::mongodb::bson::{self, oid::ObjectId};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // For oneshot()

#[derive(Default)]
struct InMemoryCategories {
    items: Mutex<Vec<Category>>,
}

impl InMemoryCategories {
    fn insert(&self, name: &str, fields: &[&str]) -> Category {
        let category = Category::new(CreateCategory {
            name: name.to_string(),
            description: format!("{name} category"),
            fields: fields.iter().map(|s| s.to_string()).collect(),
        });
        self.items.lock().unwrap().push(category.clone());
        category
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategories {
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let category = Category::new(input);
        self.items.lock().unwrap().push(category.clone());
        Ok(category)
    }

    async fn get_by_id(&self, id: ObjectId) -> CategoryResult<Option<Category>> {
        Ok(self.items.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> CategoryResult<Vec<Category>> {
        Ok(self.items.lock().unwrap().clone())
    }

    async fn update(&self, _id: ObjectId, _input: UpdateCategory) -> CategoryResult<()> {
        Err(CategoryError::Internal("not used by product tests".to_string()))
    }

    async fn delete(&self, id: ObjectId) -> CategoryResult<()> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|c| c.id != id);
        if items.len() == before {
            return Err(CategoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryProducts {
    items: Mutex<Vec<Product>>,
}

fn matches(product: &Product, filter: &SearchFilter) -> bool {
    if let Some(ref id_category) = filter.id_category {
        if !id_category.is_empty() && product.id_category != *id_category {
            return false;
        }
    }
    if let Some(ref query) = filter.query {
        let query = query.to_lowercase();
        if !product.name.to_lowercase().contains(&query)
            && !product.description.to_lowercase().contains(&query)
        {
            return false;
        }
    }
    filter.price_min.is_none_or(|min| product.price >= min)
        && filter.price_max.is_none_or(|max| product.price <= max)
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input)?;
        self.items.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        Ok(self.items.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_page(
        &self,
        filter: SearchFilter,
        pagination: Pagination,
    ) -> ProductResult<Page<Product>> {
        let items = self.items.lock().unwrap();
        let matching: Vec<&Product> = items.iter().filter(|p| matches(p, &filter)).collect();
        let Some(skip) = pagination.skip() else {
            return Ok(Page::new(vec![], matching.len() as u64, &pagination));
        };
        let page = matching
            .iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(pagination.page_size() as usize)
            .map(|p| (*p).clone())
            .collect();
        Ok(Page::new(page, matching.len() as u64, &pagination))
    }

    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<()> {
        let mut items = self.items.lock().unwrap();
        let product = items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ProductError::NotFound)?;
        if let Some(id_category) = input.id_category {
            product.id_category = id_category;
        }
        if let Some(name) = input.name {
            product.name = name;
        }
        if let Some(description) = input.description {
            product.description = description;
        }
        if let Some(stock) = input.stock {
            product.stock = stock;
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        for (key, value) in input.extra {
            product.extra.insert(key, bson::to_bson(&value).unwrap());
        }
        product.timestamps.updated_at = Some(chrono::Utc::now());
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> ProductResult<()> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|p| p.id != id);
        if items.len() == before {
            return Err(ProductError::NotFound);
        }
        Ok(())
    }
}

struct TestApp {
    router: axum::Router,
    categories: Arc<InMemoryCategories>,
}

fn app_with_page_size(page_size: u64) -> TestApp {
    let categories = Arc::new(InMemoryCategories::default());
    let service = ProductService::new(
        InMemoryProducts::default(),
        Arc::clone(&categories),
        page_size,
    );
    TestApp {
        router: handlers::router(service),
        categories,
    }
}

fn app() -> TestApp {
    app_with_page_size(10)
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn phone(id_category: &str, name: &str, price: f64) -> Value {
    json!({
        "id_category": id_category,
        "name": name,
        "description": "d",
        "stock": 5,
        "price": price,
        "color": "black",
        "ram": "8GB"
    })
}

async fn create(app: &TestApp, body: Value) -> ProductResponse {
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/products", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: ProductCreated = json_body(response.into_body()).await;
    assert_eq!(created.message, "Product created successfully");
    created.product
}

#[tokio::test]
async fn test_create_product_with_category_fields() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);

    let product = create(&app, phone(&phones.id.to_hex(), "X1", 199.0)).await;

    assert_eq!(product.name, "X1");
    assert_eq!(product.id_category, phones.id.to_hex());
    assert_eq!(product.extra["color"], "black");
    assert_eq!(product.extra["ram"], "8GB");
    assert!(product.timestamps.updated_at.is_none());
    assert!(ObjectId::parse_str(&product.id).is_ok());
}

#[tokio::test]
async fn test_create_product_missing_field_returns_400() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);

    let mut body = phone(&phones.id.to_hex(), "X1", 199.0);
    body.as_object_mut().unwrap().remove("ram");

    let response = app
        .router
        .oneshot(json_request("POST", "/products", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Missing required additional field(s): ram");
}

#[tokio::test]
async fn test_create_product_unknown_field_returns_400() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);

    let mut body = phone(&phones.id.to_hex(), "X1", 199.0);
    body["screen_size"] = json!("6.1in");

    let response = app
        .router
        .oneshot(json_request("POST", "/products", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        r#"Campo "screen_size" no permitido para esta categoría"#
    );
}

#[tokio::test]
async fn test_create_product_unknown_category_returns_404() {
    let app = app();

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/products",
            phone(&ObjectId::new().to_hex(), "X1", 199.0),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Category not found");
}

#[tokio::test]
async fn test_create_product_missing_base_field_returns_400() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);

    let mut body = phone(&phones.id.to_hex(), "X1", 199.0);
    body.as_object_mut().unwrap().remove("price");

    let response = app
        .router
        .oneshot(json_request("POST", "/products", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_accepts_any_numeric_stock_and_price() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);

    let mut body = phone(&phones.id.to_hex(), &"X".repeat(300), -1.0);
    body["stock"] = json!(2.5);

    let product = create(&app, body).await;
    assert_eq!(product.stock.as_f64(), Some(2.5));
    assert_eq!(product.price, -1.0);
    assert_eq!(product.name.len(), 300);
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    let product = create(&app, phone(&phones.id.to_hex(), "X1", 199.0)).await;

    let response = app
        .router
        .oneshot(empty_request("GET", &format!("/products/{}", product.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(fetched, product);
}

#[tokio::test]
async fn test_get_unknown_product_returns_404() {
    let response = app()
        .router
        .oneshot(empty_request(
            "GET",
            &format!("/products/{}", ObjectId::new().to_hex()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_get_with_malformed_key_returns_400() {
    let response = app()
        .router
        .oneshot(empty_request("GET", "/products/not-an-id"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Invalid id: not-an-id");
}

#[tokio::test]
async fn test_list_pages() {
    let app = app_with_page_size(2);
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    for name in ["A", "B", "C", "D", "E"] {
        create(&app, phone(&phones.id.to_hex(), name, 100.0)).await;
    }

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/products/3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].name, "E");

    let response = app
        .router
        .oneshot(empty_request("GET", "/products"))
        .await
        .unwrap();
    let page: ProductPage = json_body(response.into_body()).await;
    let names: Vec<_> = page.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn test_list_past_the_end_is_empty() {
    let response = app()
        .router
        .oneshot(empty_request("GET", "/products/4"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: ProductPage = json_body(response.into_body()).await;
    assert!(page.products.is_empty());
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_list_far_beyond_the_end_is_empty() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    create(&app, phone(&phones.id.to_hex(), "X1", 199.0)).await;

    let response = app
        .router
        .oneshot(empty_request("GET", "/products/1000000000000000000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: ProductPage = json_body(response.into_body()).await;
    assert!(page.products.is_empty());
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_page_zero_returns_400() {
    let response = app()
        .router
        .oneshot(empty_request("GET", "/products/0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_by_price_range() {
    let app = app_with_page_size(2);
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    let hex = phones.id.to_hex();
    for (name, price) in [("Cheap", 50.0), ("Mid1", 100.0), ("Mid2", 150.0), ("Mid3", 200.0), ("Top", 900.0)] {
        create(&app, phone(&hex, name, price)).await;
    }

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/search/1",
            json!({"price_min": 100, "price_max": 200}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.products.len(), 2);
    assert!(
        page.products
            .iter()
            .all(|p| (100.0..=200.0).contains(&p.price))
    );
}

#[tokio::test]
async fn test_search_by_query_and_category() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    let tablets = app.categories.insert("Tablets", &["color", "ram"]);
    create(&app, phone(&phones.id.to_hex(), "Galaxy S", 500.0)).await;
    create(&app, phone(&tablets.id.to_hex(), "Galaxy Tab", 600.0)).await;
    create(&app, phone(&phones.id.to_hex(), "Pixel", 550.0)).await;

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/search/1",
            json!({"query": "galaxy", "id_category": phones.id.to_hex()}),
        ))
        .await
        .unwrap();

    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].name, "Galaxy S");
}

#[tokio::test]
async fn test_search_with_bad_page_returns_400() {
    let response = app()
        .router
        .oneshot(json_request("POST", "/search/first", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_product() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    let product = create(&app, phone(&phones.id.to_hex(), "X1", 199.0)).await;
    let uri = format!("/products/{}", product.id);

    let response = app
        .router
        .clone()
        .oneshot(json_request("PUT", &uri, json!({"price": 179, "color": "white"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Product updated successfully");

    let response = app.router.oneshot(empty_request("GET", &uri)).await.unwrap();
    let fetched: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(fetched.price, 179.0);
    assert_eq!(fetched.extra["color"], "white");
    assert_eq!(fetched.timestamps.created_at, product.timestamps.created_at);
    assert!(fetched.timestamps.updated_at.is_some());
}

#[tokio::test]
async fn test_update_with_empty_body_returns_400() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    let product = create(&app, phone(&phones.id.to_hex(), "X1", 199.0)).await;

    let response = app
        .router
        .oneshot(json_request(
            "PUT",
            &format!("/products/{}", product.id),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "No data provided");
}

#[tokio::test]
async fn test_update_cannot_reach_into_timestamps() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    let product = create(&app, phone(&phones.id.to_hex(), "X1", 199.0)).await;
    let uri = format!("/products/{}", product.id);

    for body in [
        json!({"timestamps.created_at": null}),
        json!({"price.x": 1}),
        json!({"$foo": "bar"}),
    ] {
        let response = app
            .router
            .clone()
            .oneshot(json_request("PUT", &uri, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app.router.oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(fetched, product);
}

#[tokio::test]
async fn test_update_moves_product_to_another_category() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    let tablets = app.categories.insert("Tablets", &["color", "ram"]);
    let product = create(&app, phone(&phones.id.to_hex(), "X1", 199.0)).await;
    let uri = format!("/products/{}", product.id);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({"id_category": tablets.id.to_hex()}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/search/1",
            json!({"id_category": tablets.id.to_hex()}),
        ))
        .await
        .unwrap();
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].id, product.id);
    assert_eq!(page.products[0].name, "X1");
}

#[tokio::test]
async fn test_update_unknown_product_returns_404() {
    let response = app()
        .router
        .oneshot(json_request(
            "PUT",
            &format!("/products/{}", ObjectId::new().to_hex()),
            json!({"name": "X2"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_by_page_number_returns_400() {
    let response = app()
        .router
        .oneshot(json_request("PUT", "/products/2", json!({"name": "X2"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_product_then_404() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    let product = create(&app, phone(&phones.id.to_hex(), "X1", 199.0)).await;
    let uri = format!("/products/{}", product.id);

    let response = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Product deleted successfully");

    let response = app.router.oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_category_leaves_products() {
    let app = app();
    let phones = app.categories.insert("Phones", &["color", "ram"]);
    let product = create(&app, phone(&phones.id.to_hex(), "X1", 199.0)).await;

    app.categories.delete(phones.id).await.unwrap();

    let response = app
        .router
        .oneshot(empty_request("GET", &format!("/products/{}", product.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
