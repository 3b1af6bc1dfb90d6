use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};

/// Keys every product already carries; a category cannot declare them as
/// additional fields.
pub const RESERVED_FIELD_NAMES: [&str; 8] = [
    "_id",
    "id",
    "id_category",
    "name",
    "description",
    "stock",
    "price",
    "timestamps",
];

/// Category entity as stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    /// Additional attributes every product of this category must carry
    pub fields: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        Self {
            id: ObjectId::new(),
            name: input.name,
            description: input.description,
            fields: input.fields,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// DTO for creating a category
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Phones",
    "description": "Mobile phones",
    "fields": ["color", "ram"]
}))]
pub struct CreateCategory {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    pub fields: Vec<String>,
}

/// DTO for a partial category update; at least one field must be present
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategory {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<String>>,
}

impl UpdateCategory {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.fields.is_none()
    }
}

/// Category as returned by the API, with its id as a hex string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    #[serde(rename = "_id")]
    #[schema(example = "6650f1c2a4b9e3d2c1a0b9f8")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub fields: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_hex(),
            name: category.name,
            description: category.description,
            fields: category.fields,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryList {
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryCreated {
    pub message: String,
    pub category: CategoryResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A name MongoDB stores as a plain top-level key: no `.` path separator
/// and no leading `$` operator prefix.
pub fn is_plain_field_name(name: &str) -> bool {
    !name.starts_with('$') && !name.contains('.')
}

/// Check a category's declared field names.
///
/// The list must be non-empty. Names must be non-blank, unique and plain
/// (see [`is_plain_field_name`]), and none may shadow a base product key.
pub fn validate_field_names(fields: &[String]) -> CategoryResult<()> {
    if fields.is_empty() {
        return Err(CategoryError::Validation(
            r#"The "fields" list cannot be empty"#.to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if field.trim().is_empty() {
            return Err(CategoryError::Validation(
                "Field names cannot be blank".to_string(),
            ));
        }
        if !is_plain_field_name(field) {
            return Err(CategoryError::Validation(format!(
                r#"Field "{field}" cannot contain '.' or start with '$'"#
            )));
        }
        if RESERVED_FIELD_NAMES.contains(&field.as_str()) {
            return Err(CategoryError::Validation(format!(
                r#"Field "{field}" is reserved"#
            )));
        }
        if !seen.insert(field.as_str()) {
            return Err(CategoryError::Validation(format!(
                r#"Field "{field}" is declared more than once"#
            )));
        }
    }

    Ok(())
}
