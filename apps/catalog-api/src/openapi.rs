//! OpenAPI documentation configuration

use utoipa::OpenApi;
use utoipa::openapi::{InfoBuilder, LicenseBuilder, OpenApiBuilder};

/// Combined OpenAPI documentation for the catalog.
///
/// Paths are relative to the configured `URI` prefix; `create_router` adds it.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let info = InfoBuilder::new()
            .title("Catalog API")
            .version(env!("CARGO_PKG_VERSION"))
            .description(Some(
                "Product catalog where each category declares the extra fields its products carry",
            ))
            .license(Some(LicenseBuilder::new().name("MIT").build()))
            .build();

        let mut doc = OpenApiBuilder::new().info(info).build();
        doc.merge(domain_categories::ApiDoc::openapi());
        doc.merge(domain_products::ApiDoc::openapi());
        doc
    }
}
