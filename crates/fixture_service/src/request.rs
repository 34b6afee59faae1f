//! Fixture creation requests.

use api_client::SearchFilter;
use serde_json::{json, Value};

/// A foreign key to look up before the entity is created.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyRef {
    /// Payload field receiving the resolved id. Dots address nested objects.
    pub field: String,

    /// Entity type searched, e.g. `tax`.
    pub entity: String,

    pub filter: SearchFilter,
}

impl DependencyRef {
    pub fn new(field: impl Into<String>, entity: impl Into<String>, filter: SearchFilter) -> Self {
        Self {
            field: field.into(),
            entity: entity.into(),
            filter,
        }
    }
}

/// Everything needed to create one entity.
///
/// The payload is built from three layers, later ones winning:
/// the default dataset, the resolved dependency ids, the caller's data.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRequest {
    /// Entity endpoint, e.g. `product`.
    pub endpoint: String,

    /// Default dataset name. Falls back to `endpoint`.
    pub dataset: Option<String>,

    pub data: Value,

    pub dependency_refs: Vec<DependencyRef>,
}

impl FixtureRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            dataset: None,
            data: json!({}),
            dependency_refs: Vec::new(),
        }
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Adds a lookup of `entity` by `filter` whose id goes to `field`.
    pub fn resolve(
        mut self,
        field: impl Into<String>,
        entity: impl Into<String>,
        filter: SearchFilter,
    ) -> Self {
        self.dependency_refs
            .push(DependencyRef::new(field, entity, filter));
        self
    }

    /// The dataset the payload starts from.
    pub fn dataset_name(&self) -> &str {
        self.dataset.as_deref().unwrap_or(&self.endpoint)
    }
}
