use chrono::{DateTime, Utc};
use database::Page;
use domain_categories::is_plain_field_name;
use mongodb::bson::{self, Bson, Document, oid::ObjectId};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{ProductError, ProductResult};

/// Keys a partial update may not touch
pub const IMMUTABLE_KEYS: [&str; 3] = ["_id", "id", "timestamps"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Product entity as stored in MongoDB.
///
/// The base attributes are typed; everything the category adds lives in
/// `extra` and is stored inline next to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub id_category: String,
    pub name: String,
    pub description: String,
    /// Kept as sent: integer or floating point
    pub stock: Number,
    pub price: f64,
    pub timestamps: Timestamps,
    #[serde(flatten)]
    pub extra: Document,
}

impl Product {
    /// Fails only when `stock` or an additional value has no BSON
    /// representation, such as an integer above `i64::MAX`.
    pub fn new(input: CreateProduct) -> ProductResult<Self> {
        number_to_bson(&input.stock)?;
        let extra = bson::to_document(&input.extra)
            .map_err(|e| ProductError::Validation(format!("Unsupported field value: {e}")))?;

        Ok(Self {
            id: ObjectId::new(),
            id_category: input.id_category,
            name: input.name,
            description: input.description,
            stock: input.stock,
            price: input.price,
            timestamps: Timestamps {
                created_at: Utc::now(),
                updated_at: None,
            },
            extra,
        })
    }
}

/// DTO for creating a product; keys beyond the base attributes are the
/// category's additional fields
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[schema(example = json!({
    "id_category": "6650f1c2a4b9e3d2c1a0b9f8",
    "name": "X1",
    "description": "Entry level phone",
    "stock": 5,
    "price": 199.0,
    "color": "black",
    "ram": "8GB"
}))]
pub struct CreateProduct {
    pub id_category: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    #[schema(value_type = f64)]
    pub stock: Number,
    pub price: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// DTO for a partial product update.
///
/// The category schema is not re-checked, so any plain additional key is
/// accepted apart from [`IMMUTABLE_KEYS`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateProduct {
    pub id_category: Option<String>,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub stock: Option<Number>,
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.id_category.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.stock.is_none()
            && self.price.is_none()
            && self.extra.is_empty()
    }

    /// Reject additional keys a `$set` must not see.
    ///
    /// A key is judged by its first path segment, so `timestamps.created_at`
    /// counts as `timestamps`. Dotted paths and `$` operators are refused
    /// outright.
    pub fn check_keys(&self) -> ProductResult<()> {
        for key in self.extra.keys() {
            let root = key.split('.').next().unwrap_or(key);
            if IMMUTABLE_KEYS.contains(&root) {
                return Err(ProductError::Validation(format!(
                    r#"Field "{key}" cannot be updated"#
                )));
            }
            if !is_plain_field_name(key) {
                return Err(ProductError::Validation(format!(
                    r#"Field "{key}" cannot contain '.' or start with '$'"#
                )));
            }
        }
        Ok(())
    }
}

/// Body of `POST /search/{page}`; every criterion is optional and they
/// combine with AND
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
#[schema(example = json!({"query": "phone", "price_min": 100, "price_max": 200}))]
pub struct SearchFilter {
    /// Exact category id
    pub id_category: Option<String>,
    /// Case-insensitive substring of the name or the description
    pub query: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

/// Product as returned by the API, with its id as a hex string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    #[schema(example = "6650f1c2a4b9e3d2c1a0b9f9")]
    pub id: String,
    pub id_category: String,
    pub name: String,
    pub description: String,
    #[schema(value_type = f64)]
    pub stock: Number,
    pub price: f64,
    pub timestamps: Timestamps,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let extra = product
            .extra
            .into_iter()
            .map(|(key, value)| (key, value.into_relaxed_extjson()))
            .collect();

        Self {
            id: product.id.to_hex(),
            id_category: product.id_category,
            name: product.name,
            description: product.description,
            stock: product.stock,
            price: product.price,
            timestamps: product.timestamps,
            extra,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<ProductResponse>,
    pub total_pages: u64,
}

impl From<Page<Product>> for ProductPage {
    fn from(page: Page<Product>) -> Self {
        let page = page.map(ProductResponse::from);
        Self {
            products: page.items,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductCreated {
    pub message: String,
    pub product: ProductResponse,
}

/// The `{key}` segment of `/products/{key}`.
///
/// A valid ObjectId wins, so a 24-digit key is an id. Any other run of
/// digits is a page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKey {
    Page(u64),
    Id(ObjectId),
}

impl ProductKey {
    /// The id, or `InvalidId` for a page number
    pub fn into_id(self) -> ProductResult<ObjectId> {
        match self {
            ProductKey::Id(id) => Ok(id),
            ProductKey::Page(page) => Err(ProductError::InvalidId(page.to_string())),
        }
    }
}

impl FromStr for ProductKey {
    type Err = ProductError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = ObjectId::parse_str(raw) {
            return Ok(ProductKey::Id(id));
        }

        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw
                .parse()
                .map(ProductKey::Page)
                .map_err(|_| ProductError::InvalidId(raw.to_string()));
        }

        Err(ProductError::InvalidId(raw.to_string()))
    }
}

/// BSON value for a JSON value coming from a request body
pub(crate) fn json_to_bson(value: &Value) -> ProductResult<Bson> {
    bson::to_bson(value)
        .map_err(|e| ProductError::Validation(format!("Unsupported field value: {e}")))
}

pub(crate) fn number_to_bson(number: &Number) -> ProductResult<Bson> {
    json_to_bson(&Value::Number(number.clone()))
}
