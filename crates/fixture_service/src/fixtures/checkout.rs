//! Shipping and payment method fixtures.

use api_client::ResolvedEntity;
use futures::try_join;
use serde_json::{json, Value};
use tracing::instrument;

use super::{baseline, str_field};
use crate::merge::merge;
use crate::{FixtureResult, FixtureService};

#[cfg(test)]
#[path = "checkout_tests.rs"]
mod tests;

/// Creates a shipping method available for every cart and delivered in the
/// baseline delivery time.
#[instrument(skip(service, data))]
pub async fn create_shipping_method(
    service: &FixtureService,
    data: Value,
) -> FixtureResult<ResolvedEntity> {
    let (rule, delivery_time) = try_join!(
        service.find_by_name("rule", baseline::SHIPPING_RULE),
        service.find_by_name("delivery-time", baseline::DELIVERY_TIME)
    )?;

    let payload = merge(
        json!({
            "availabilityRuleId": rule.id,
            "deliveryTimeId": delivery_time.id,
        }),
        data,
    );

    service.create("shipping-method", payload).await
}

/// Creates an active payment method assigned to the default storefront.
///
/// The English translation carries the method's name.
#[instrument(skip(service, data))]
pub async fn create_payment_method(
    service: &FixtureService,
    data: Value,
) -> FixtureResult<ResolvedEntity> {
    let (sales_channel, language) = try_join!(
        service.find_by_name("sales-channel", baseline::SALES_CHANNEL),
        service.find_by_name("language", baseline::LANGUAGE)
    )?;

    let name = str_field(&data, service.defaults().get("payment-method"), "name");

    let payload = merge(
        json!({
            "active": true,
            "translations": [{
                "languageId": language.id,
                "name": name,
            }],
            "salesChannels": [{ "id": sales_channel.id }],
        }),
        data,
    );

    service.create("payment-method", payload).await
}
