use super::*;
use crate::test_support::{fixture_service, mount_create_echo, received_body};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_promotion_gets_discount_via_sync() {
    let server = MockServer::start().await;
    mount_create_echo(&server, "promotion").await;
    Mock::given(method("POST"))
        .and(path("/api/_action/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let service = fixture_service(&server);

    let promotion = create_promotion(&service, json!({"id": "promo-1", "code": "spring"}))
        .await
        .unwrap();

    assert_eq!(promotion.attribute_str("code"), Some("spring"));
    assert_eq!(promotion.attribute_str("name"), Some("Thunder Tuesday"));

    let sync = received_body(&server, "POST", "/api/_action/sync").await;
    let records = sync["promotion_discount"]["payload"].as_array().unwrap();
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r["promotionId"] == "promo-1"));
}

#[tokio::test]
async fn test_attach_discount_rejects_payload_without_records() {
    let server = MockServer::start().await;
    let service = fixture_service(&server);

    let result = attach_discount(&service, "promo-1", json!({"discount": []})).await;

    assert!(matches!(result, Err(FixtureError::Dataset(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}
