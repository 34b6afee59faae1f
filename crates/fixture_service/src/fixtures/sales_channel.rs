//! Sales channel fixtures.

use api_client::{ResolvedEntity, SearchFilter};
use futures::try_join;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::baseline;
use crate::merge::merge;
use crate::{FixtureResult, FixtureService};

#[cfg(test)]
#[path = "sales_channel_tests.rs"]
mod tests;

/// Sales channel type name of a storefront.
pub const STOREFRONT_TYPE: &str = "Storefront";

/// Creates a sales channel wired to the baseline currency, language,
/// customer group, country, payment method, shipping method and root
/// category.
#[instrument(skip(service, data))]
pub async fn create_sales_channel(
    service: &FixtureService,
    data: Value,
) -> FixtureResult<ResolvedEntity> {
    let country_filter = SearchFilter::equals("iso", baseline::COUNTRY_ISO);
    let (
        channel_type,
        currency,
        language,
        customer_group,
        country,
        payment_method,
        shipping_method,
        category,
    ) = try_join!(
        service.find_by_name("sales-channel-type", STOREFRONT_TYPE),
        service.find_by_name("currency", baseline::CURRENCY),
        service.find_by_name("language", baseline::LANGUAGE),
        service.find_by_name("customer-group", baseline::CUSTOMER_GROUP),
        service.find("country", &country_filter),
        service.find_by_name("payment-method", baseline::PAYMENT_METHOD),
        service.find_by_name("shipping-method", baseline::SHIPPING_METHOD),
        service.find_by_name("category", baseline::CATEGORY)
    )?;

    let payload = merge(
        json!({
            "typeId": channel_type.id,
            "currencyId": currency.id,
            "languageId": language.id,
            "customerGroupId": customer_group.id,
            "countryId": country.id,
            "paymentMethodId": payment_method.id,
            "shippingMethodId": shipping_method.id,
            "navigationCategoryId": category.id,
            "currencies": [{ "id": currency.id }],
            "languages": [{ "id": language.id }],
            "countries": [{ "id": country.id }],
            "paymentMethods": [{ "id": payment_method.id }],
            "shippingMethods": [{ "id": shipping_method.id }],
        }),
        data,
    );

    service.create("sales-channel", payload).await
}

/// Adds a domain to an existing sales channel.
///
/// The domain uses the baseline currency, language and `BASE en-GB` snippet
/// set.
#[instrument(skip(service))]
pub async fn set_sales_channel_domain(
    service: &FixtureService,
    sales_channel_name: &str,
    url: &str,
) -> FixtureResult<Value> {
    let (sales_channel, currency, language, snippet_set) = try_join!(
        service.find_by_name("sales-channel", sales_channel_name),
        service.find_by_name("currency", baseline::CURRENCY),
        service.find_by_name("language", baseline::LANGUAGE),
        service.find_by_name("snippet-set", baseline::SNIPPET_SET)
    )?;

    let response = service
        .update(
            "sales-channel",
            &sales_channel.id,
            json!({
                "domains": [{
                    "url": url,
                    "currencyId": currency.id,
                    "languageId": language.id,
                    "snippetSetId": snippet_set.id,
                }],
            }),
        )
        .await?;

    info!(
        sales_channel = sales_channel_name,
        url = url,
        "Sales channel domain added"
    );

    Ok(response)
}
