use super::*;
use crate::test_support::{
    fixture_service, mount_create_echo, mount_search, mount_search_response, received_body,
    StaticSession, TEST_TOKEN,
};
use api_client::ApiConfig;
use std::sync::atomic::Ordering;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_create_uuid_is_hex_without_dashes() {
    let id = FixtureService::create_uuid();

    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(id, FixtureService::create_uuid());
}

#[tokio::test]
async fn test_request_sends_bearer_token_and_normalizes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/_info/version"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "6.5.8.0"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(StaticSession::default());
    let service = FixtureService::new(
        ApiClient::new(&ApiConfig::admin(server.uri())).unwrap(),
        session.clone(),
        DefaultDatasets::empty(),
    );

    let data = service
        .request(HttpMethod::Get, "/_info/version", None)
        .await
        .unwrap();

    assert_eq!(data["version"], "6.5.8.0");
    assert_eq!(session.authentications.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_search_with_one_match_returns_single_entity() {
    let server = MockServer::start().await;
    mount_search(&server, "tax", "name", "Standard rate", "tax-19").await;

    let service = fixture_service(&server);

    let tax = service
        .search("tax", &SearchFilter::by_name("Standard rate"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(tax.id, "tax-19");
    assert_eq!(tax.attribute_str("name"), Some("Standard rate"));
}

#[tokio::test]
async fn test_search_with_no_match_returns_none() {
    let server = MockServer::start().await;
    mount_search_response(
        &server,
        "tax",
        "name",
        "Luxury rate",
        json!({"total": 0, "data": []}),
    )
    .await;

    let service = fixture_service(&server);

    let result = service
        .search("tax", &SearchFilter::by_name("Luxury rate"))
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_search_with_several_matches_uses_first() {
    let server = MockServer::start().await;
    mount_search_response(
        &server,
        "state-machine-state",
        "technicalName",
        "open",
        json!({"data": [
            {"id": "order-open", "attributes": {"technicalName": "open"}},
            {"id": "delivery-open", "attributes": {"technicalName": "open"}}
        ]}),
    )
    .await;

    let service = fixture_service(&server);

    let state = service
        .search(
            "state-machine-state",
            &SearchFilter::equals("technicalName", "open"),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(state.id, "order-open");
}

#[tokio::test]
async fn test_find_turns_missing_entity_into_not_found() {
    let server = MockServer::start().await;
    mount_search_response(&server, "country", "iso", "XX", json!({"data": []})).await;

    let service = fixture_service(&server);

    let error = service
        .find("country", &SearchFilter::equals("iso", "XX"))
        .await
        .unwrap_err();

    match error {
        FixtureError::NotFound {
            entity,
            field,
            value,
        } => {
            assert_eq!(entity, "country");
            assert_eq!(field, "iso");
            assert_eq!(value, "XX");
        }
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_propagates_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search/tax"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = fixture_service(&server);

    let error = service
        .search("tax", &SearchFilter::by_name("Standard rate"))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(500));
}

#[tokio::test]
async fn test_create_merges_defaults_and_caller_wins() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/category"))
        .and(query_param("_response", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = fixture_service(&server);

    let category = service
        .create("category", json!({"name": "Summer sale"}))
        .await
        .unwrap();

    let posted = received_body(&server, "POST", "/api/category").await;
    assert_eq!(posted["name"], "Summer sale");
    assert_eq!(posted["active"], true);
    assert_eq!(posted["id"], category.id.as_str());
    assert_eq!(category.id.len(), 32);
    assert_eq!(category.attribute_str("name"), Some("Summer sale"));
    assert!(category.attribute("id").is_none());
}

#[tokio::test]
async fn test_create_keeps_caller_id_and_parses_response() {
    let server = MockServer::start().await;
    mount_create_echo(&server, "tag").await;

    let service = fixture_service(&server);

    let tag = service
        .create("tag", json!({"id": "tag-1", "name": "Bestseller"}))
        .await
        .unwrap();

    assert_eq!(tag.id, "tag-1");
    assert_eq!(tag.attribute_str("name"), Some("Bestseller"));
}

#[tokio::test]
async fn test_create_rejects_non_object_payload() {
    let server = MockServer::start().await;
    let service = fixture_service(&server);

    let result = service.create("tag", json!(["not", "an", "object"])).await;

    assert!(matches!(result, Err(FixtureError::Validation(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_fixture_layers_defaults_dependencies_and_data() {
    let server = MockServer::start().await;
    mount_search(&server, "tax", "name", "Standard rate", "tax-19").await;
    mount_search(&server, "country", "iso", "DE", "country-de").await;
    mount_create_echo(&server, "product").await;

    let service = fixture_service(&server);
    let request = FixtureRequest::new("product")
        .resolve("taxId", "tax", SearchFilter::by_name("Standard rate"))
        .resolve(
            "extensions.origin.countryId",
            "country",
            SearchFilter::equals("iso", "DE"),
        )
        .with_data(json!({"name": "Caller product", "stock": 5}));

    let product = service.create_fixture(request).await.unwrap();

    assert_eq!(product.attribute_str("name"), Some("Caller product"));
    assert_eq!(product.attribute_str("taxId"), Some("tax-19"));
    assert_eq!(product.attributes["stock"], 5);
    assert_eq!(product.attributes["productNumber"], "RS-333");
    assert_eq!(
        product.attributes["extensions"]["origin"]["countryId"],
        "country-de"
    );
}

#[tokio::test]
async fn test_create_fixture_caller_data_overrides_resolved_id() {
    let server = MockServer::start().await;
    mount_search(&server, "tax", "name", "Standard rate", "tax-19").await;
    mount_create_echo(&server, "product").await;

    let service = fixture_service(&server);
    let request = FixtureRequest::new("product")
        .resolve("taxId", "tax", SearchFilter::by_name("Standard rate"))
        .with_data(json!({"taxId": "explicit-tax"}));

    let product = service.create_fixture(request).await.unwrap();

    assert_eq!(product.attribute_str("taxId"), Some("explicit-tax"));
}

#[tokio::test]
async fn test_create_fixture_aborts_when_dependency_missing() {
    let server = MockServer::start().await;
    mount_search_response(&server, "tax", "name", "Nope", json!({"data": []})).await;
    Mock::given(method("POST"))
        .and(path("/api/product"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let service = fixture_service(&server);
    let request =
        FixtureRequest::new("product").resolve("taxId", "tax", SearchFilter::by_name("Nope"));

    let error = service.create_fixture(request).await.unwrap_err();

    assert!(error.is_not_found());
}

#[tokio::test]
async fn test_create_fixture_uses_named_dataset() {
    let server = MockServer::start().await;
    mount_create_echo(&server, "cms-page").await;

    let service = fixture_service(&server);
    let request = FixtureRequest::new("cms-page").with_dataset("cms-section");

    let page = service.create_fixture(request).await.unwrap();

    assert_eq!(page.attribute_str("sizingMode"), Some("boxed"));
}

#[tokio::test]
async fn test_update_requires_id() {
    let server = MockServer::start().await;
    let service = fixture_service(&server);

    let result = service.update("product", "  ", json!({"active": false})).await;

    assert!(matches!(result, Err(FixtureError::Validation(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_patches_entity() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/product/p1"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(body_json(json!({"active": false})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = fixture_service(&server);

    let response = service
        .update("product", "p1", json!({"active": false}))
        .await
        .unwrap();

    assert_eq!(response, Value::Null);
}

#[tokio::test]
async fn test_delete_searches_then_deletes_by_id() {
    let server = MockServer::start().await;
    mount_search(&server, "category", "name", "Summer sale", "cat-7").await;
    Mock::given(method("DELETE"))
        .and(path("/api/category/cat-7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = fixture_service(&server);

    let deleted = service.delete("category", "Summer sale").await.unwrap();

    assert_eq!(deleted.id, "cat-7");
}

#[tokio::test]
async fn test_delete_unknown_name_is_not_found() {
    let server = MockServer::start().await;
    mount_search_response(&server, "category", "name", "Ghost", json!({"data": []})).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let service = fixture_service(&server);

    let error = service.delete("category", "Ghost").await.unwrap_err();

    assert!(error.is_not_found());
}

#[tokio::test]
async fn test_clear_cache_reports_failure() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/_action/cache"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let service = fixture_service(&server);

    let error = service.clear_cache().await.unwrap_err();

    assert_eq!(error.status(), Some(500));
}

#[tokio::test]
async fn test_sync_posts_payload() {
    let server = MockServer::start().await;
    let payload = json!({"promotion_discount": {"action": "upsert", "entity": "promotion_discount", "payload": []}});
    Mock::given(method("POST"))
        .and(path("/api/_action/sync"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let service = fixture_service(&server);

    let response = service.sync(&payload).await.unwrap();

    assert_eq!(response["success"], true);
}
