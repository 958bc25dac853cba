//! Book domain model
//!
//! A `Book` is one document of the catalog collection. Only `upc`, `title`
//! and `category` carry meaning for filtering and lookup; every other field
//! the ingestion process stored travels along untouched in `attributes` and
//! is only ever displayed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single catalog item
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Book {
    /// Universal product code, unique and immutable
    pub upc: String,
    pub title: String,
    pub category: String,
    /// Opaque display attributes (price, availability, rating, ...)
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Book {
    pub fn new(upc: impl Into<String>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            upc: upc.into(),
            title: title.into(),
            category: category.into(),
            attributes: Map::new(),
        }
    }

    /// Builder-style helper for attaching a display attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Display text for an attribute, if present and non-null
    ///
    /// Strings are returned as-is, other scalars and containers use their
    /// JSON representation.
    pub fn attribute_text(&self, key: &str) -> Option<String> {
        match self.attributes.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Value of a queryable field
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Upc => &self.upc,
            Field::Title => &self.title,
            Field::Category => &self.category,
        }
    }
}

/// Fields the catalog can query on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Upc,
    Title,
    Category,
}

impl Field {
    /// Storage-level field name
    pub fn name(&self) -> &'static str {
        match self {
            Field::Upc => "upc",
            Field::Title => "title",
            Field::Category => "category",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
