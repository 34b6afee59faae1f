//! Admin-side order fixture.
//!
//! Orders placed through the storefront live in [`crate::storefront`].

use api_client::{ResolvedEntity, SearchFilter};
use futures::try_join;
use serde_json::{json, Value};
use tracing::instrument;

use super::baseline;
use crate::merge::{merge, merge_all};
use crate::{FixtureResult, FixtureService};

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;

fn order_customer() -> Value {
    json!({
        "firstName": "Max",
        "lastName": "Mustermann",
        "email": "example@shopware.com",
        "street": "Ebbinghoff 10",
        "zipcode": "48624",
        "city": "Schöppingen",
    })
}

/// Creates an open order in the headless sales channel, billed to a fixed
/// German customer.
#[instrument(skip(service, data))]
pub async fn create_order(service: &FixtureService, data: Value) -> FixtureResult<ResolvedEntity> {
    let salutation_filter = SearchFilter::equals("displayName", baseline::SALUTATION);
    let country_filter = SearchFilter::equals("iso", baseline::COUNTRY_ISO);
    let state_filter = SearchFilter::equals("technicalName", baseline::ORDER_STATE);
    let (salutation, country, currency, state, sales_channel) = try_join!(
        service.find("salutation", &salutation_filter),
        service.find("country", &country_filter),
        service.find_by_name("currency", baseline::CURRENCY),
        service.find("state-machine-state", &state_filter),
        service.find_by_name("sales-channel", baseline::HEADLESS_SALES_CHANNEL)
    )?;

    let billing_address = merge(
        order_customer(),
        json!({
            "salutationId": salutation.id,
            "countryId": country.id,
        }),
    );
    let customer = merge_all([
        order_customer(),
        json!({ "salutationId": salutation.id }),
        json!({ "billingAddress": billing_address.clone() }),
    ]);

    let payload = merge(
        json!({
            "currencyId": currency.id,
            "currencyFactor": currency.attribute("factor").cloned().unwrap_or(json!(1.0)),
            "stateId": state.id,
            "salesChannelId": sales_channel.id,
            "billingAddress": billing_address,
            "orderCustomer": customer,
        }),
        data,
    );

    service.create("order", payload).await
}
