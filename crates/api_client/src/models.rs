//! Shared request/response models.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// The default search operator.
pub const DEFAULT_OPERATOR: &str = "equals";

/// An entity returned by a search or create call.
///
/// Admin API responses come either as JSON:API resources
/// (`{"id": ..., "type": ..., "attributes": {...}}`) or as flat entities
/// (`{"id": ..., "name": ...}`). Both shapes end up here with the id split off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub id: String,
    pub attributes: Value,
}

impl ResolvedEntity {
    pub fn new(id: impl Into<String>, attributes: Value) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Parses an entity from a normalized response value.
    ///
    /// Returns `None` unless `value` is an object with a string `id`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let id = object.get("id")?.as_str()?.to_string();

        let attributes = match object.get("attributes") {
            Some(attributes @ Value::Object(_)) => attributes.clone(),
            _ => {
                let mut flat: Map<String, Value> = object.clone();
                flat.remove("id");
                Value::Object(flat)
            }
        };

        Some(Self { id, attributes })
    }

    /// Looks up a top-level attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Looks up a top-level string attribute.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }
}

/// A single field filter for the admin search endpoint.
///
/// Serializes to `{"field": ..., "type": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFilter {
    pub field: String,

    #[serde(rename = "type")]
    pub operator: String,

    pub value: String,
}

impl SearchFilter {
    /// An `equals` filter on `field`.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: DEFAULT_OPERATOR.to_string(),
            value: value.into(),
        }
    }

    /// An `equals` filter on the `name` field.
    pub fn by_name(value: impl Into<String>) -> Self {
        Self::equals("name", value)
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// The search criteria body posted to `/search/{entity}`.
    pub fn to_criteria(&self) -> Value {
        json!({ "filter": [self] })
    }
}
