//! Product fixtures.

use api_client::ResolvedEntity;
use futures::try_join;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::{baseline, take_str};
use crate::merge::merge;
use crate::{FixtureResult, FixtureService};

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;

/// Visibility value for "visible everywhere" in a sales channel.
pub const VISIBILITY_ALL: u32 = 30;

/// Names of the baseline entities a product is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOptions {
    pub tax_name: String,
    pub manufacturer_name: String,
    pub sales_channel_name: String,
    pub category_name: String,
}

impl Default for ProductOptions {
    fn default() -> Self {
        Self {
            tax_name: baseline::TAX.to_string(),
            manufacturer_name: baseline::MANUFACTURER.to_string(),
            sales_channel_name: baseline::SALES_CHANNEL.to_string(),
            category_name: baseline::CATEGORY.to_string(),
        }
    }
}

/// Creates a product attached to the default tax, manufacturer, sales channel
/// and category.
///
/// A `taxName` field in `data` picks another tax rate; it is not sent.
pub async fn create_product(service: &FixtureService, data: Value) -> FixtureResult<ResolvedEntity> {
    create_product_with(service, data, &ProductOptions::default()).await
}

/// Creates a product and makes it visible in a storefront.
///
/// 1. tax and manufacturer are looked up concurrently,
/// 2. the product is created with their ids under the caller's data,
/// 3. sales channel and category are looked up concurrently and the product
///    is patched with its visibility and category.
#[instrument(skip(service, data))]
pub async fn create_product_with(
    service: &FixtureService,
    mut data: Value,
    options: &ProductOptions,
) -> FixtureResult<ResolvedEntity> {
    let tax_name = take_str(&mut data, "taxName").unwrap_or_else(|| options.tax_name.clone());

    let (tax, manufacturer) = try_join!(
        service.find_by_name("tax", &tax_name),
        service.find_by_name("product-manufacturer", &options.manufacturer_name)
    )?;

    let payload = merge(
        json!({
            "taxId": tax.id,
            "manufacturerId": manufacturer.id,
        }),
        data,
    );
    let product = service.create("product", payload).await?;

    assign_to_storefront(
        service,
        &product.id,
        &options.sales_channel_name,
        &options.category_name,
    )
    .await?;

    Ok(product)
}

/// Makes an existing product visible in the default storefront under
/// `category_name`.
#[instrument(skip(service))]
pub async fn set_product_visibility(
    service: &FixtureService,
    product_name: &str,
    category_name: &str,
) -> FixtureResult<ResolvedEntity> {
    let product = service.find_by_name("product", product_name).await?;

    assign_to_storefront(service, &product.id, baseline::SALES_CHANNEL, category_name).await?;

    Ok(product)
}

async fn assign_to_storefront(
    service: &FixtureService,
    product_id: &str,
    sales_channel_name: &str,
    category_name: &str,
) -> FixtureResult<()> {
    let (sales_channel, category) = try_join!(
        service.find_by_name("sales-channel", sales_channel_name),
        service.find_by_name("category", category_name)
    )?;

    service
        .update(
            "product",
            product_id,
            json!({
                "visibilities": [{
                    "visibility": VISIBILITY_ALL,
                    "salesChannelId": sales_channel.id,
                }],
                "categories": [{ "id": category.id }],
            }),
        )
        .await?;

    info!(
        product_id = product_id,
        sales_channel = sales_channel_name,
        category = category_name,
        "Product assigned to storefront"
    );

    Ok(())
}
