//! API routes module
//!
//! Wires the category and product domains to HTTP routes.

pub mod health;

use axum::Router;
use domain_categories::{CategoryService, MongoCategoryRepository};
use domain_products::{MongoProductRepository, ProductService};

use crate::state::AppState;

/// Create all catalog routes
/// Note: These are nested under the `URI` prefix by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    let catalog = &state.config.catalog;

    let categories = CategoryService::new(MongoCategoryRepository::with_collection(
        &state.db,
        &catalog.categories_collection,
    ));

    // Products resolve their category schema through the same repository
    let products = ProductService::new(
        MongoProductRepository::with_collection(&state.db, &catalog.products_collection),
        categories.repository(),
        catalog.page_size,
    );

    Router::new()
        .merge(domain_categories::handlers::router(categories))
        .merge(domain_products::handlers::router(products))
}

/// Create the indexes both collections rely on
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let catalog = &state.config.catalog;

    MongoCategoryRepository::with_collection(&state.db, &catalog.categories_collection)
        .create_indexes()
        .await?;
    MongoProductRepository::with_collection(&state.db, &catalog.products_collection)
        .create_indexes()
        .await?;

    Ok(())
}
