//! Named default datasets fixtures start from.
//!
//! The baseline datasets are compiled into the crate. A directory of
//! `<name>.json` files can replace individual datasets or add new ones.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::{FixtureError, FixtureResult};

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;

const BUILTIN_DATASETS: &[(&str, &str)] = &[
    ("category", include_str!("../data/category.json")),
    ("cms-page", include_str!("../data/cms-page.json")),
    ("cms-section", include_str!("../data/cms-section.json")),
    ("customer", include_str!("../data/customer.json")),
    ("customer-address", include_str!("../data/customer-address.json")),
    ("discount", include_str!("../data/discount.json")),
    ("language", include_str!("../data/language.json")),
    ("order", include_str!("../data/order.json")),
    ("payment-method", include_str!("../data/payment-method.json")),
    ("product", include_str!("../data/product.json")),
    ("promotion", include_str!("../data/promotion.json")),
    ("property-group", include_str!("../data/property-group.json")),
    ("sales-channel", include_str!("../data/sales-channel.json")),
    ("shipping-method", include_str!("../data/shipping-method.json")),
    ("snippet", include_str!("../data/snippet.json")),
    ("storefront-customer", include_str!("../data/storefront-customer.json")),
];

/// A set of named JSON datasets.
#[derive(Debug, Clone, Default)]
pub struct DefaultDatasets {
    datasets: HashMap<String, Value>,
}

impl DefaultDatasets {
    /// An empty set; every fixture then starts from the caller's data alone.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The datasets shipped with the crate.
    ///
    /// # Errors
    /// Returns `FixtureError::Dataset` if a compiled-in dataset is not valid JSON.
    pub fn builtin() -> FixtureResult<Self> {
        let mut datasets = HashMap::with_capacity(BUILTIN_DATASETS.len());
        for (name, raw) in BUILTIN_DATASETS {
            let value = serde_json::from_str(raw).map_err(|e| {
                FixtureError::Dataset(format!("Built-in dataset '{}' is invalid: {}", name, e))
            })?;
            datasets.insert((*name).to_string(), value);
        }

        Ok(Self { datasets })
    }

    /// The built-in datasets with every `<name>.json` in `dir` layered on top.
    ///
    /// A file replaces the built-in dataset of the same name entirely.
    ///
    /// # Errors
    /// Returns `FixtureError::Dataset` if the directory cannot be read or a file
    /// is not valid JSON.
    pub fn from_dir(dir: impl AsRef<Path>) -> FixtureResult<Self> {
        let dir = dir.as_ref();
        let mut defaults = Self::builtin()?;

        let entries = fs::read_dir(dir).map_err(|e| {
            FixtureError::Dataset(format!("Cannot read fixture directory {}: {}", dir.display(), e))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| FixtureError::Dataset(e.to_string()))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let raw = fs::read_to_string(&path).map_err(|e| {
                FixtureError::Dataset(format!("Cannot read {}: {}", path.display(), e))
            })?;
            let value: Value = serde_json::from_str(&raw).map_err(|e| {
                FixtureError::Dataset(format!("{} is not valid JSON: {}", path.display(), e))
            })?;

            debug!(dataset = name, path = %path.display(), "Loaded fixture dataset override");
            defaults.datasets.insert(name.to_string(), value);
        }

        info!(
            dir = %dir.display(),
            datasets = defaults.datasets.len(),
            "Fixture datasets loaded"
        );

        Ok(defaults)
    }

    /// Adds or replaces a dataset.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.datasets.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.datasets.get(name)
    }

    /// Returns a copy of a dataset that a fixture cannot do without.
    ///
    /// # Errors
    /// Returns `FixtureError::Dataset` if no dataset has that name.
    pub fn require(&self, name: &str) -> FixtureResult<Value> {
        self.get(name)
            .cloned()
            .ok_or_else(|| FixtureError::Dataset(format!("No dataset named '{}'", name)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }
}
