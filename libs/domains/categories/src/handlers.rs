use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ObjectIdPath, ValidatedJson,
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CategoryResult;
use crate::models::{
    CategoryCreated, CategoryList, CategoryResponse, CreateCategory, MessageResponse,
    UpdateCategory,
};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

/// OpenAPI documentation for the Categories API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        update_category,
        delete_category,
    ),
    components(
        schemas(
            CategoryResponse,
            CategoryList,
            CategoryCreated,
            CreateCategory,
            UpdateCategory,
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
        (name = "Categories", description = "Categories and the extra fields their products carry")
    )
)]
pub struct ApiDoc;

/// Category routes: `/categories` and `/categories/{id}`
pub fn router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .with_state(shared_service)
}

/// List all categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "All categories", body = CategoryList),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
) -> CategoryResult<Json<CategoryList>> {
    let categories = service.list_categories().await?;
    Ok(Json(CategoryList {
        categories: categories.into_iter().map(CategoryResponse::from).collect(),
    }))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = CategoryCreated),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CategoryResult<impl IntoResponse> {
    let category = service.create_category(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryCreated {
            message: "Category created successfully".to_string(),
            category: category.into(),
        }),
    ))
}

/// Get a category by id
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    params(
        ("id" = String, Path, description = "Category ObjectId (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<Json<CategoryResponse>> {
    let category = service.get_category(id).await?;
    Ok(Json(category.into()))
}

/// Partially update a category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    params(
        ("id" = String, Path, description = "Category ObjectId (24 hex characters)")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CategoryResult<Json<MessageResponse>> {
    service.update_category(id, input).await?;
    Ok(Json(MessageResponse::new("Category updated successfully")))
}

/// Delete a category
///
/// Products that reference it are left untouched.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    params(
        ("id" = String, Path, description = "Category ObjectId (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<Json<MessageResponse>> {
    service.delete_category(id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
