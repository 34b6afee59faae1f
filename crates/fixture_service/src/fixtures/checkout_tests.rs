use super::*;
use crate::test_support::{fixture_service, mount_create_echo, mount_search};
use wiremock::MockServer;

#[tokio::test]
async fn test_shipping_method_gets_rule_and_delivery_time() {
    let server = MockServer::start().await;
    mount_search(&server, "rule", "name", "Cart >= 0 (Payment)", "rule-1").await;
    mount_search(&server, "delivery-time", "name", "3-4 weeks", "dt-1").await;
    mount_create_echo(&server, "shipping-method").await;

    let service = fixture_service(&server);

    let method = create_shipping_method(&service, json!({"name": "Express"}))
        .await
        .unwrap();

    assert_eq!(method.attribute_str("name"), Some("Express"));
    assert_eq!(method.attribute_str("availabilityRuleId"), Some("rule-1"));
    assert_eq!(method.attribute_str("deliveryTimeId"), Some("dt-1"));
    assert!(method.attributes["prices"].is_array());
}

#[tokio::test]
async fn test_payment_method_is_active_translated_and_assigned() {
    let server = MockServer::start().await;
    mount_search(&server, "sales-channel", "name", "Storefront", "sc-storefront").await;
    mount_search(&server, "language", "name", "English", "lang-en").await;
    mount_create_echo(&server, "payment-method").await;

    let service = fixture_service(&server);

    let payment = create_payment_method(&service, json!({"name": "Pay later"}))
        .await
        .unwrap();

    assert_eq!(payment.attributes["active"], true);
    assert_eq!(
        payment.attributes["translations"],
        json!([{"languageId": "lang-en", "name": "Pay later"}])
    );
    assert_eq!(
        payment.attributes["salesChannels"],
        json!([{"id": "sc-storefront"}])
    );
}

#[tokio::test]
async fn test_payment_method_translation_falls_back_to_default_name() {
    let server = MockServer::start().await;
    mount_search(&server, "sales-channel", "name", "Storefront", "sc-storefront").await;
    mount_search(&server, "language", "name", "English", "lang-en").await;
    mount_create_echo(&server, "payment-method").await;

    let service = fixture_service(&server);

    let payment = create_payment_method(&service, json!({})).await.unwrap();

    assert_eq!(payment.attributes["translations"][0]["name"], "CredStick");
}
