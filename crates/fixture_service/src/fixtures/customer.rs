//! Customer fixture.

use api_client::{ResolvedEntity, SearchFilter};
use futures::try_join;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::{baseline, str_field};
use crate::merge::merge;
use crate::{FixtureError, FixtureResult, FixtureService};

#[cfg(test)]
#[path = "customer_tests.rs"]
mod tests;

/// Creates a storefront customer with one address used for billing and
/// shipping.
///
/// Salutation, country, payment method, customer group and sales channel are
/// the baseline ones. The address starts from the first entry of the
/// `customer-address` dataset.
#[instrument(skip(service, data))]
pub async fn create_customer(service: &FixtureService, data: Value) -> FixtureResult<ResolvedEntity> {
    let customer_id = data
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(FixtureService::create_uuid);
    let address_id = FixtureService::create_uuid();

    let salutation_filter = SearchFilter::equals("displayName", baseline::SALUTATION);
    let country_filter = SearchFilter::equals("iso", baseline::COUNTRY_ISO);
    let (salutation, country, payment_method, customer_group, sales_channel) = try_join!(
        service.find("salutation", &salutation_filter),
        service.find("country", &country_filter),
        service.find_by_name("payment-method", baseline::PAYMENT_METHOD),
        service.find_by_name("customer-group", baseline::CUSTOMER_GROUP),
        service.find_by_name("sales-channel", baseline::SALES_CHANNEL)
    )?;

    let address_defaults = service
        .defaults()
        .get("customer-address")
        .and_then(|d| d.pointer("/addresses/0"))
        .cloned()
        .unwrap_or_else(|| json!({}));
    let address = merge(
        address_defaults,
        json!({
            "id": address_id,
            "customerId": customer_id,
            "salutationId": salutation.id,
            "countryId": country.id,
        }),
    );

    let payload = merge(
        json!({
            "id": customer_id,
            "salutationId": salutation.id,
            "defaultPaymentMethodId": payment_method.id,
            "salesChannelId": sales_channel.id,
            "groupId": customer_group.id,
            "defaultBillingAddressId": address_id,
            "defaultShippingAddressId": address_id,
            "addresses": [address],
        }),
        data,
    );

    service.create("customer", payload).await
}

/// Creates a customer group from `group` and moves the customer with
/// `customer_number` into it.
///
/// # Errors
/// `FixtureError::Validation` if `group` has no name, `FixtureError::NotFound`
/// if the customer does not exist. The group is created before the customer
/// is looked up.
#[instrument(skip(service, group))]
pub async fn set_customer_group(
    service: &FixtureService,
    customer_number: &str,
    group: Value,
) -> FixtureResult<Value> {
    let group_name = str_field(&group, None, "name")
        .ok_or_else(|| FixtureError::Validation("Customer group needs a name".to_string()))?;

    service.create("customer-group", group).await?;

    let customer_filter = SearchFilter::equals("customerNumber", customer_number);
    let (customer, customer_group) = try_join!(
        service.find("customer", &customer_filter),
        service.find_by_name("customer-group", &group_name)
    )?;

    let response = service
        .update("customer", &customer.id, json!({"groupId": customer_group.id}))
        .await?;

    info!(
        customer_id = %customer.id,
        group_id = %customer_group.id,
        "Customer moved to customer group"
    );

    Ok(response)
}
