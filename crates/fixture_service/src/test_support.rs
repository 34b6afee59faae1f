//! Shared helpers for the unit tests of this crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use api_client::{ApiClient, ApiConfig};
use async_trait::async_trait;
use auth_handler::{AuthResult, Credential, SessionAuthenticator};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{DefaultDatasets, FixtureService};

pub const TEST_TOKEN: &str = "test-token";

/// A session that always hands out the same long-lived token.
#[derive(Debug, Default)]
pub struct StaticSession {
    pub authentications: AtomicUsize,
}

#[async_trait]
impl SessionAuthenticator for StaticSession {
    async fn authenticate(&self) -> AuthResult<Credential> {
        self.authentications.fetch_add(1, Ordering::SeqCst);
        Ok(Credential::new(TEST_TOKEN, None, i64::MAX))
    }

    async fn validate(&self) -> AuthResult<bool> {
        Ok(true)
    }

    async fn invalidate(&self) {}
}

pub fn fixture_service(server: &MockServer) -> FixtureService {
    let client = ApiClient::new(&ApiConfig::admin(server.uri())).unwrap();
    FixtureService::new(
        client,
        Arc::new(StaticSession::default()),
        DefaultDatasets::builtin().unwrap(),
    )
}

/// Answers `POST /api/search/{entity}` for an `equals` filter with one entity.
pub async fn mount_search(server: &MockServer, entity: &str, field: &str, value: &str, id: &str) {
    mount_search_response(
        server,
        entity,
        field,
        value,
        json!({"total": 1, "data": [{"id": id, "attributes": {field: value}}]}),
    )
    .await;
}

/// Answers `POST /api/search/{entity}` for an `equals` filter with `body`.
pub async fn mount_search_response(
    server: &MockServer,
    entity: &str,
    field: &str,
    value: &str,
    body: Value,
) {
    Mock::given(method("POST"))
        .and(path(format!("/api/search/{entity}")))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(body_json(json!({
            "filter": [{"field": field, "type": "equals", "value": value}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answers `POST /api/{endpoint}` by echoing the posted payload as `data`.
pub async fn mount_create_echo(server: &MockServer, endpoint: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/api/{endpoint}")))
        .respond_with(|request: &wiremock::Request| {
            let payload: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
            ResponseTemplate::new(200).set_body_json(json!({"data": payload}))
        })
        .mount(server)
        .await;
}

/// The JSON body of the first received request matching `method` and `path`.
pub async fn received_body(server: &MockServer, http_method: &str, request_path: &str) -> Value {
    let requests = server.received_requests().await.unwrap();
    let request = requests
        .iter()
        .find(|r| r.method.as_str() == http_method && r.url.path() == request_path)
        .unwrap_or_else(|| panic!("no {http_method} {request_path} request received"));
    serde_json::from_slice(&request.body).unwrap()
}
