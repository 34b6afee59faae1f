//! Per-entity fixtures.
//!
//! Each fixture is a free function over a [`FixtureService`](crate::FixtureService).
//! It looks up the baseline entities it references by name, layers the ids
//! over the entity's default dataset, puts the caller's data on top and
//! creates the entity. Lookups that do not depend on each other run
//! concurrently; steps that need an earlier id run after it.
//!
//! None of the fixtures clean up after a failed step. Tests reset the whole
//! environment between runs instead.

use serde_json::Value;

pub mod catalog;
pub mod checkout;
pub mod customer;
pub mod localization;
pub mod order;
pub mod product;
pub mod promotion;
pub mod sales_channel;

pub use catalog::{create_category, create_cms_page, create_property_group};
pub use checkout::{create_payment_method, create_shipping_method};
pub use customer::{create_customer, set_customer_group};
pub use localization::{create_language, create_snippet};
pub use order::create_order;
pub use product::{create_product, create_product_with, set_product_visibility, ProductOptions};
pub use promotion::{attach_discount, create_promotion};
pub use sales_channel::{create_sales_channel, set_sales_channel_domain};

/// Baseline entity names every fresh installation ships with.
pub mod baseline {
    pub const TAX: &str = "Standard rate";
    pub const MANUFACTURER: &str = "shopware AG";
    pub const SALES_CHANNEL: &str = "Storefront";
    pub const HEADLESS_SALES_CHANNEL: &str = "Headless";
    pub const CATEGORY: &str = "Home";
    pub const SALUTATION: &str = "Mr.";
    pub const COUNTRY_ISO: &str = "DE";
    pub const CURRENCY: &str = "Euro";
    pub const LANGUAGE: &str = "English";
    pub const PAYMENT_METHOD: &str = "Invoice";
    pub const SHIPPING_METHOD: &str = "Standard";
    pub const CUSTOMER_GROUP: &str = "Standard customer group";
    pub const SNIPPET_SET: &str = "BASE en-GB";
    pub const SHIPPING_RULE: &str = "Cart >= 0 (Payment)";
    pub const DELIVERY_TIME: &str = "3-4 weeks";
    pub const ORDER_STATE: &str = "open";
    pub const LOCALE_CODE: &str = "en-PH";
}

/// Removes a string field from an object payload and returns it.
pub(crate) fn take_str(data: &mut Value, key: &str) -> Option<String> {
    let object = data.as_object_mut()?;
    match object.get(key) {
        Some(Value::String(_)) => object
            .remove(key)
            .and_then(|v| v.as_str().map(str::to_string)),
        _ => None,
    }
}

/// The caller's string field, or the same field of a default dataset.
pub(crate) fn str_field(data: &Value, defaults: Option<&Value>, key: &str) -> Option<String> {
    data.get(key)
        .or_else(|| defaults.and_then(|d| d.get(key)))
        .and_then(Value::as_str)
        .map(str::to_string)
}
