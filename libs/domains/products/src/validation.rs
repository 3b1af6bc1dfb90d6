//! Checks a product's additional fields against its category.

use domain_categories::Category;
use std::collections::BTreeSet;
use thiserror::Error;

/// Why a set of additional fields does not fit a category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error(r#"Campo "{0}" no permitido para esta categoría"#)]
    FieldNotPermitted(String),

    #[error("Missing required additional field(s): {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

/// The additional fields a category requires, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySchema {
    fields: Vec<String>,
}

impl CategorySchema {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    fn permits(&self, key: &str) -> bool {
        self.fields.iter().any(|field| field == key)
    }

    /// Require `keys` to be exactly the declared fields.
    ///
    /// Unknown keys are reported first, the smallest one in byte order.
    /// Otherwise every absent field is reported, in declared order.
    pub fn check<'a, I>(&self, keys: I) -> Result<(), SchemaViolation>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let supplied: BTreeSet<&str> = keys.into_iter().collect();

        if let Some(key) = supplied.iter().find(|key| !self.permits(key)) {
            return Err(SchemaViolation::FieldNotPermitted(key.to_string()));
        }

        let missing: Vec<String> = self
            .fields
            .iter()
            .filter(|field| !supplied.contains(field.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolation::MissingFields(missing))
        }
    }
}

impl From<&Category> for CategorySchema {
    fn from(category: &Category) -> Self {
        Self::new(category.fields.clone())
    }
}
