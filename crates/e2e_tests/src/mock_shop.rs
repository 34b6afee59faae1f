//! In-memory shop served through WireMock.
//!
//! [`MockShop`] answers the admin API the way the real shop does for the
//! calls the harness makes: entities can be created, searched, patched, read
//! and deleted, and they stay around for later calls. Token, cache and cleanup
//! endpoints are mocked separately so tests can count or break them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use fixture_service::merge;
use serde_json::{json, Value};
use test_utils::{HarnessConfig, HarnessContext};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Access key of the seeded `Storefront` sales channel.
pub const STOREFRONT_ACCESS_KEY: &str = "SWSCMOCKSTOREFRONT";

/// Lifetime of issued tokens unless configured otherwise.
pub const TOKEN_LIFETIME_SECS: i64 = 600;

type Entities = HashMap<String, Vec<(String, Value)>>;

/// Stored entities per entity name, in insertion order.
#[derive(Debug, Clone, Default)]
struct ShopData {
    entities: Arc<Mutex<Entities>>,
}

impl ShopData {
    fn with<T>(&self, f: impl FnOnce(&mut Entities) -> T) -> T {
        let mut entities = match self.entities.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut entities)
    }
}

fn entity_json(id: &str, attributes: &Value) -> Value {
    json!({"id": id, "attributes": attributes})
}

fn not_found(entity: &str, id: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "errors": [{
            "status": "404",
            "code": "FRAMEWORK__ENTITY_NOT_FOUND",
            "detail": format!("Could not find entity for {entity} with id {id}"),
        }]
    }))
}

fn matches_filter(id: &str, attributes: &Value, filter: &Value) -> bool {
    let field = filter.get("field").and_then(Value::as_str).unwrap_or_default();
    let expected = filter.get("value");
    if field == "id" {
        return expected.and_then(Value::as_str) == Some(id);
    }
    attributes.get(field) == expected
}

impl Respond for ShopData {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if !request.headers.contains_key("authorization") {
            return ResponseTemplate::new(401).set_body_json(json!({
                "errors": [{"status": "401", "title": "Unauthorized"}]
            }));
        }

        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let segments: Vec<&str> = request
            .url
            .path()
            .trim_start_matches("/api/")
            .split('/')
            .collect();

        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["search", entity]) => {
                let filters = body
                    .get("filter")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let data: Vec<Value> = self.with(|entities| {
                    entities
                        .get(*entity)
                        .map(|items| {
                            items
                                .iter()
                                .filter(|(id, attributes)| {
                                    filters.iter().all(|f| matches_filter(id, attributes, f))
                                })
                                .map(|(id, attributes)| entity_json(id, attributes))
                                .collect()
                        })
                        .unwrap_or_default()
                });
                ResponseTemplate::new(200).set_body_json(json!({"total": data.len(), "data": data}))
            }
            ("POST", [entity]) => {
                let mut attributes = match body {
                    Value::Object(fields) => fields,
                    _ => return ResponseTemplate::new(400),
                };
                let id = match attributes.remove("id") {
                    Some(Value::String(id)) => id,
                    _ => return ResponseTemplate::new(400),
                };
                let attributes = Value::Object(attributes);
                let response = entity_json(&id, &attributes);
                self.with(|entities| {
                    entities
                        .entry(entity.to_string())
                        .or_default()
                        .push((id, attributes))
                });
                ResponseTemplate::new(200).set_body_json(json!({"data": response}))
            }
            ("GET", [entity, id]) => self.with(|entities| {
                entities
                    .get(*entity)
                    .and_then(|items| items.iter().find(|(item_id, _)| item_id == id))
                    .map(|(id, attributes)| {
                        ResponseTemplate::new(200)
                            .set_body_json(json!({"data": entity_json(id, attributes)}))
                    })
                    .unwrap_or_else(|| not_found(entity, id))
            }),
            ("PATCH", [entity, id]) => self.with(|entities| {
                let item = entities
                    .get_mut(*entity)
                    .and_then(|items| items.iter_mut().find(|(item_id, _)| item_id == id));
                match item {
                    Some((_, attributes)) => {
                        *attributes = merge(attributes.take(), body);
                        ResponseTemplate::new(204)
                    }
                    None => not_found(entity, id),
                }
            }),
            ("DELETE", [entity, id]) => self.with(|entities| {
                let items = entities.entry(entity.to_string()).or_default();
                let before = items.len();
                items.retain(|(item_id, _)| item_id != id);
                if items.len() < before {
                    ResponseTemplate::new(204)
                } else {
                    not_found(entity, id)
                }
            }),
            _ => ResponseTemplate::new(404),
        }
    }
}

/// Hands out `token-1`, `token-2`, ... and counts the requests.
#[derive(Debug, Clone)]
struct TokenIssuer {
    issued: Arc<AtomicUsize>,
    expires_in: i64,
}

impl Respond for TokenIssuer {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": self.expires_in,
            "access_token": format!("token-{n}"),
            "refresh_token": format!("refresh-{n}"),
        }))
    }
}

/// WireMock-backed shop for scenario tests.
pub struct MockShop {
    server: MockServer,
    data: ShopData,
    tokens: Arc<AtomicUsize>,
}

impl MockShop {
    /// Starts an empty shop with the admin API mounted.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let data = ShopData::default();

        Mock::given(path_regex(r"^/api/.+"))
            .respond_with(data.clone())
            .with_priority(10)
            .mount(&server)
            .await;

        Self {
            server,
            data,
            tokens: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Starts a shop seeded with the baseline entities fixtures rely on.
    pub async fn with_baseline() -> Self {
        let shop = Self::start().await;
        shop.seed_baseline();
        shop.mock_token(TOKEN_LIFETIME_SECS).await;
        shop
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Harness configuration pointing at this shop. The cleanup server is
    /// expected on the same port.
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig {
            base_url: self.uri(),
            cleanup_port: self.server.address().port(),
            ..HarnessConfig::default()
        }
    }

    pub fn context(&self) -> Result<HarnessContext> {
        Ok(HarnessContext::new(self.config())?)
    }

    /// Stores an entity directly, bypassing the API.
    pub fn seed(&self, entity: &str, id: &str, attributes: Value) {
        self.data.with(|entities| {
            entities
                .entry(entity.to_string())
                .or_default()
                .push((id.to_string(), attributes))
        });
    }

    /// Seeds tax, manufacturer, sales channels, category and the lookups
    /// customers and orders need.
    pub fn seed_baseline(&self) {
        self.seed("tax", "tax-standard", json!({"name": "Standard rate", "taxRate": 19}));
        self.seed(
            "product-manufacturer",
            "manufacturer-shopware",
            json!({"name": "shopware AG"}),
        );
        self.seed(
            "sales-channel",
            "sc-storefront",
            json!({"name": "Storefront", "accessKey": STOREFRONT_ACCESS_KEY}),
        );
        self.seed(
            "sales-channel",
            "sc-headless",
            json!({"name": "Headless", "accessKey": "SWSCMOCKHEADLESS"}),
        );
        self.seed("category", "category-home", json!({"name": "Home"}));
        self.seed("salutation", "salutation-mr", json!({"displayName": "Mr."}));
        self.seed("country", "country-de", json!({"iso": "DE", "name": "Germany"}));
        self.seed(
            "payment-method",
            "payment-invoice",
            json!({"name": "Invoice"}),
        );
        self.seed(
            "customer-group",
            "group-standard",
            json!({"name": "Standard customer group"}),
        );
    }

    /// A stored entity's attributes.
    pub fn stored(&self, entity: &str, id: &str) -> Option<Value> {
        self.data.with(|entities| {
            entities
                .get(entity)
                .and_then(|items| items.iter().find(|(item_id, _)| item_id == id))
                .map(|(_, attributes)| attributes.clone())
        })
    }

    /// Number of stored entities of one kind.
    pub fn count(&self, entity: &str) -> usize {
        self.data
            .with(|entities| entities.get(entity).map_or(0, Vec::len))
    }

    /// Mounts the token endpoint, issuing tokens living `expires_in` seconds.
    pub async fn mock_token(&self, expires_in: i64) {
        Mock::given(method("POST"))
            .and(path("/api/oauth/token"))
            .respond_with(TokenIssuer {
                issued: self.tokens.clone(),
                expires_in,
            })
            .mount(&self.server)
            .await;
    }

    /// Mounts a token endpoint that answers slowly, for overlap tests.
    pub async fn mock_slow_token(&self, delay: std::time::Duration) {
        let issuer = TokenIssuer {
            issued: self.tokens.clone(),
            expires_in: TOKEN_LIFETIME_SECS,
        };
        Mock::given(method("POST"))
            .and(path("/api/oauth/token"))
            .respond_with(move |request: &Request| issuer.respond(request).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Number of tokens issued so far.
    pub fn tokens_issued(&self) -> usize {
        self.tokens.load(Ordering::SeqCst)
    }

    /// Mounts the cleanup endpoint answering with `body`.
    pub async fn mock_cleanup(&self, body: &str) {
        Mock::given(method("GET"))
            .and(path("/cleanup"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mounts the cache endpoint answering with `status`.
    pub async fn mock_cache_clear(&self, status: u16) {
        let mut response = ResponseTemplate::new(status);
        if status >= 400 {
            response = response.set_body_json(json!({
                "errors": [{"status": status.to_string(), "title": "Cache could not be cleared"}]
            }));
        }
        Mock::given(method("DELETE"))
            .and(path("/api/_action/cache"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Number of received requests with `method` and `path`.
    pub async fn requests_to(&self, http_method: &str, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .count()
    }
}
