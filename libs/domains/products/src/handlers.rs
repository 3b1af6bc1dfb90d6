use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use domain_categories::{CategoryRepository, MessageResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, ProductCreated, ProductKey, ProductPage, ProductResponse, SearchFilter,
    Timestamps, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_first_page,
        create_product,
        get_product_or_page,
        update_product,
        delete_product,
        search_products,
    ),
    components(
        schemas(
            ProductResponse,
            ProductPage,
            ProductCreated,
            CreateProduct,
            UpdateProduct,
            SearchFilter,
            Timestamps,
            MessageResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Products and their category-specific fields")
    )
)]
pub struct ApiDoc;

type SharedService<P, C> = Arc<ProductService<P, C>>;

/// Product routes: `/products`, `/products/{key}` and `/search/{page}`
pub fn router<P, C>(service: ProductService<P, C>) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", get(list_first_page).post(create_product))
        .route(
            "/products/{key}",
            get(get_product_or_page)
                .put(update_product)
                .delete(delete_product),
        )
        .route("/search/{page}", post(search_products))
        .with_state(shared_service)
}

/// First page of products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    responses(
        (status = 200, description = "Page 1 of all products", body = ProductPage),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_first_page<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
) -> ProductResult<Json<ProductPage>> {
    let page = service.list_products(1).await?;
    Ok(Json(page.into()))
}

/// Create a product
///
/// The keys beyond the base attributes must be exactly the fields declared
/// by the product's category.
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductCreated),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductCreated {
            message: "Product created successfully".to_string(),
            product: product.into(),
        }),
    ))
}

/// Get a product by id, or a page of products
///
/// A numeric key is a 1-based page number; anything else must be an ObjectId.
#[utoipa::path(
    get,
    path = "/products/{key}",
    tag = "Products",
    params(
        ("key" = String, Path, description = "Page number, or product ObjectId (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Product found; a page number answers with a ProductPage instead", body = ProductResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product_or_page<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    Path(key): Path<String>,
) -> ProductResult<Response> {
    match key.parse::<ProductKey>()? {
        ProductKey::Page(page) => {
            let page: ProductPage = service.list_products(page).await?.into();
            Ok(Json(page).into_response())
        }
        ProductKey::Id(id) => {
            let product: ProductResponse = service.get_product(id).await?.into();
            Ok(Json(product).into_response())
        }
    }
}

/// Partially update a product
///
/// The category schema is not checked again.
#[utoipa::path(
    put,
    path = "/products/{key}",
    tag = "Products",
    params(
        ("key" = String, Path, description = "Product ObjectId (24 hex characters)")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    Path(key): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<MessageResponse>> {
    let id = key.parse::<ProductKey>()?.into_id()?;
    service.update_product(id, input).await?;
    Ok(Json(MessageResponse::new("Product updated successfully")))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{key}",
    tag = "Products",
    params(
        ("key" = String, Path, description = "Product ObjectId (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    Path(key): Path<String>,
) -> ProductResult<Json<MessageResponse>> {
    let id = key.parse::<ProductKey>()?.into_id()?;
    service.delete_product(id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// Search products
///
/// Criteria combine with AND: exact category, case-insensitive substring of
/// name or description, inclusive price bounds.
#[utoipa::path(
    post,
    path = "/search/{page}",
    tag = "Products",
    params(
        ("page" = u64, Path, description = "1-based page number")
    ),
    request_body = SearchFilter,
    responses(
        (status = 200, description = "Page of matching products", body = ProductPage),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    Path(page): Path<String>,
    ValidatedJson(filter): ValidatedJson<SearchFilter>,
) -> ProductResult<Json<ProductPage>> {
    let page = page
        .parse::<u64>()
        .map_err(|_| ProductError::Validation(format!("Invalid page: {page}")))?;
    let page = service.search_products(page, filter).await?;
    Ok(Json(page.into()))
}
