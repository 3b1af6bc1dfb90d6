use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse_or, server::ServerConfig,
};

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Catalog-specific settings, fixed at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Products per page for listings and searches
    pub page_size: u64,
    /// Path prefix shared by every catalog route, e.g. `api/v1/`
    pub uri: String,
    pub products_collection: String,
    pub categories_collection: String,
}

impl FromEnv for CatalogConfig {
    /// Reads from environment variables:
    /// - PAGE_SIZE: defaults to 10, must be greater than zero
    /// - URI: defaults to empty (routes at the root)
    /// - PRODUCTS_COLLECTION_NAME: defaults to "products"
    /// - CATEGORIES_COLLECTION_NAME: defaults to "categories"
    fn from_env() -> Result<Self, ConfigError> {
        let page_size: u64 = env_parse_or("PAGE_SIZE", 10)?;
        if page_size == 0 {
            return Err(ConfigError::ParseError {
                key: "PAGE_SIZE".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            page_size,
            uri: env_or_default("URI", ""),
            products_collection: env_or_default(
                "PRODUCTS_COLLECTION_NAME",
                domain_products::mongodb::DEFAULT_COLLECTION,
            ),
            categories_collection: env_or_default(
                "CATEGORIES_COLLECTION_NAME",
                domain_categories::mongodb::DEFAULT_COLLECTION,
            ),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub catalog: CatalogConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let catalog = CatalogConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            catalog,
        })
    }
}
