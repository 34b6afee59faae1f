//! Category, property group and CMS page fixtures.
//!
//! None of these reference baseline entities; they are the default dataset
//! with the caller's data on top.

use api_client::ResolvedEntity;
use serde_json::{json, Value};

use crate::merge::merge;
use crate::{FixtureResult, FixtureService};

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;

pub async fn create_category(service: &FixtureService, data: Value) -> FixtureResult<ResolvedEntity> {
    service.create("category", data).await
}

/// Creates a property group.
///
/// `options` is applied over the `property-group` dataset before `data`, so a
/// caller can swap the option list and still override single fields.
pub async fn create_property_group(
    service: &FixtureService,
    options: Value,
    data: Value,
) -> FixtureResult<ResolvedEntity> {
    service
        .create("property-group", merge(options, data))
        .await
}

/// Creates a CMS page holding one section from the `cms-section` dataset.
pub async fn create_cms_page(service: &FixtureService, data: Value) -> FixtureResult<ResolvedEntity> {
    let section = service.defaults().require("cms-section")?;

    service
        .create("cms-page", merge(json!({ "sections": [section] }), data))
        .await
}
