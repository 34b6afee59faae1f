//! Promotion fixtures.

use api_client::ResolvedEntity;
use serde_json::Value;
use tracing::{info, instrument};

use crate::{FixtureError, FixtureResult, FixtureService};

#[cfg(test)]
#[path = "promotion_tests.rs"]
mod tests;

/// Creates a promotion and attaches the `discount` dataset to it.
#[instrument(skip(service, data))]
pub async fn create_promotion(service: &FixtureService, data: Value) -> FixtureResult<ResolvedEntity> {
    let promotion = service.create("promotion", data).await?;

    let discount = service.defaults().require("discount")?;
    attach_discount(service, &promotion.id, discount).await?;

    Ok(promotion)
}

/// Writes discounts for a promotion through the sync endpoint.
///
/// `discount` is a sync payload; every record under
/// `promotion_discount.payload` gets `promotionId` set before sending.
pub async fn attach_discount(
    service: &FixtureService,
    promotion_id: &str,
    mut discount: Value,
) -> FixtureResult<Value> {
    let records = discount
        .pointer_mut("/promotion_discount/payload")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| {
            FixtureError::Dataset(
                "Discount payload needs a 'promotion_discount.payload' array".to_string(),
            )
        })?;

    for record in records.iter_mut() {
        if let Value::Object(fields) = record {
            fields.insert(
                "promotionId".to_string(),
                Value::String(promotion_id.to_string()),
            );
        }
    }

    let response = service.sync(&discount).await?;

    info!(promotion_id = promotion_id, "Discount attached to promotion");

    Ok(response)
}
