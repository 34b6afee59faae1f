//! Store API flows: customer login, registration, newsletter, cart and checkout.
//!
//! A [`StoreApi`] acts for one storefront visitor. It carries the sales
//! channel access key and the visitor's context token and sends both on every
//! call. The admin [`FixtureService`] is only used to look up the access key
//! and baseline entities.

use api_client::header::{HeaderMap, HeaderName, HeaderValue};
use api_client::{
    ApiClient, ApiResponse, HttpMethod, SearchFilter, ACCESS_KEY_HEADER, CONTEXT_TOKEN_HEADER,
};
use futures::try_join;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::fixtures::{baseline, str_field};
use crate::merge::merge_all;
use crate::{FixtureError, FixtureResult, FixtureService};

#[cfg(test)]
#[path = "storefront_tests.rs"]
mod tests;

/// Login data of a registered storefront customer.
#[derive(Debug, Clone)]
pub struct CustomerCredentials {
    pub username: String,
    pub password: SecretString,
}

impl CustomerCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Store API session of a single visitor.
#[derive(Debug, Clone)]
pub struct StoreApi {
    client: ApiClient,
    sales_channel_name: String,
    access_key: Option<String>,
    context_token: Option<String>,
}

impl StoreApi {
    /// Creates a visitor session for the default storefront sales channel.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            sales_channel_name: baseline::SALES_CHANNEL.to_string(),
            access_key: None,
            context_token: None,
        }
    }

    /// Uses another sales channel for the access key lookup.
    pub fn with_sales_channel(mut self, name: impl Into<String>) -> Self {
        self.sales_channel_name = name.into();
        self
    }

    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    pub fn sales_channel_name(&self) -> &str {
        &self.sales_channel_name
    }

    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    pub fn context_token(&self) -> Option<&str> {
        self.context_token.as_deref()
    }

    pub fn set_context_token(&mut self, token: impl Into<String>) {
        self.context_token = Some(token.into());
    }

    /// Looks up the access key of a sales channel through the admin API.
    ///
    /// # Errors
    /// `FixtureError::NotFound` if the sales channel does not exist,
    /// `FixtureError::UnexpectedResponse` if it has no access key.
    pub async fn access_key_for(
        fixtures: &FixtureService,
        sales_channel_name: &str,
    ) -> FixtureResult<String> {
        let sales_channel = fixtures
            .find_by_name("sales-channel", sales_channel_name)
            .await?;

        sales_channel
            .attribute_str("accessKey")
            .map(str::to_string)
            .ok_or_else(|| FixtureError::UnexpectedResponse {
                endpoint: "search/sales-channel".to_string(),
                reason: format!("sales channel '{}' has no access key", sales_channel_name),
            })
    }

    /// Fetches the access key of the configured sales channel unless one is
    /// already set.
    pub async fn ensure_access_key(&mut self, fixtures: &FixtureService) -> FixtureResult<()> {
        if self.access_key.is_none() {
            let key = Self::access_key_for(fixtures, &self.sales_channel_name).await?;
            debug!(sales_channel = %self.sales_channel_name, "Resolved store API access key");
            self.access_key = Some(key);
        }
        Ok(())
    }

    fn headers(&self) -> FixtureResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            (ACCESS_KEY_HEADER, &self.access_key),
            (CONTEXT_TOKEN_HEADER, &self.context_token),
        ] {
            if let Some(value) = value {
                let value = HeaderValue::from_str(value).map_err(|e| {
                    FixtureError::Validation(format!("Invalid {} header: {}", name, e))
                })?;
                headers.insert(HeaderName::from_static(name), value);
            }
        }
        Ok(headers)
    }

    /// Performs a store API request with the visitor's headers.
    ///
    /// A context token returned by the server replaces the current one.
    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    pub async fn request(
        &mut self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> FixtureResult<ApiResponse> {
        let headers = self.headers()?;
        let response = self
            .client
            .request(method, path, body, Some(&headers))
            .await?;

        if let Some(token) = response.header(CONTEXT_TOKEN_HEADER) {
            if self.context_token.as_deref() != Some(token) {
                debug!("Store API issued a new context token");
                self.context_token = Some(token.to_string());
            }
        }

        Ok(response)
    }

    /// Logs a customer in and keeps the returned context token.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&mut self, credentials: &CustomerCredentials) -> FixtureResult<String> {
        let body = json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });
        let response = self
            .request(HttpMethod::Post, "/account/login", Some(&body))
            .await?;

        if let Some(token) = response.body.get("contextToken").and_then(Value::as_str) {
            self.context_token = Some(token.to_string());
        }

        let token = self
            .context_token
            .clone()
            .ok_or_else(|| FixtureError::UnexpectedResponse {
                endpoint: "account/login".to_string(),
                reason: "no context token in response".to_string(),
            })?;

        info!("Storefront customer logged in");

        Ok(token)
    }

    /// The visitor's sales channel context.
    pub async fn context(&mut self) -> FixtureResult<Value> {
        Ok(self
            .request(HttpMethod::Get, "/context", None)
            .await?
            .data())
    }

    /// Registers a customer, or a guest when `customer.guest` is true.
    pub async fn register(&mut self, customer: &Value) -> FixtureResult<Value> {
        Ok(self
            .request(HttpMethod::Post, "/account/register", Some(customer))
            .await?
            .data())
    }

    /// Puts one piece of a product into the visitor's cart.
    pub async fn add_product_to_cart(&mut self, product_id: &str) -> FixtureResult<Value> {
        let body = json!({
            "items": [{
                "id": product_id,
                "type": "product",
                "referencedId": product_id,
                "quantity": 1,
                "stackable": true,
            }],
        });

        Ok(self
            .request(HttpMethod::Post, "/checkout/cart/line-item", Some(&body))
            .await?
            .data())
    }

    /// Turns the visitor's cart into an order.
    pub async fn place_order(&mut self) -> FixtureResult<Value> {
        let order = self
            .request(HttpMethod::Post, "/checkout/order", None)
            .await?
            .data();

        let order_id = order.get("id").and_then(Value::as_str).unwrap_or_default();
        info!(order_id = order_id, "Storefront order placed");

        Ok(order)
    }

    /// Logs a customer in and subscribes them to the newsletter.
    ///
    /// The recipient starts from the `customer` dataset with `data` on top.
    /// `username` falls back to `email`; the storefront URL falls back to the
    /// one in the `storefront-customer` dataset.
    ///
    /// # Errors
    /// `FixtureError::Validation` if the merged data lacks a username or a
    /// password.
    #[instrument(skip(self, fixtures, data))]
    pub async fn subscribe_newsletter(
        &mut self,
        fixtures: &FixtureService,
        data: Value,
    ) -> FixtureResult<Value> {
        let recipient = merge_all([
            fixtures
                .defaults()
                .get("customer")
                .cloned()
                .unwrap_or_else(|| json!({})),
            data,
        ]);

        let username = str_field(&recipient, None, "username")
            .or_else(|| str_field(&recipient, None, "email"))
            .ok_or_else(|| {
                FixtureError::Validation("Newsletter recipient needs an email".to_string())
            })?;
        let password = str_field(&recipient, None, "password").ok_or_else(|| {
            FixtureError::Validation("Newsletter recipient needs a password".to_string())
        })?;
        let storefront_url = str_field(
            &recipient,
            fixtures.defaults().get("storefront-customer"),
            "storefrontUrl",
        );

        self.ensure_access_key(fixtures).await?;
        self.login(&CustomerCredentials::new(username.clone(), password))
            .await?;

        let body = json!({
            "email": username,
            "option": "subscribe",
            "storefrontUrl": storefront_url,
        });
        let response = self
            .request(HttpMethod::Post, "/newsletter/subscribe", Some(&body))
            .await?;

        info!("Newsletter subscription sent");

        Ok(response.data())
    }

    /// Orders one product as a registered customer.
    #[instrument(skip(self, fixtures, credentials))]
    pub async fn create_order(
        &mut self,
        fixtures: &FixtureService,
        product_id: &str,
        credentials: &CustomerCredentials,
    ) -> FixtureResult<Value> {
        self.ensure_access_key(fixtures).await?;
        self.login(credentials).await?;
        self.add_product_to_cart(product_id).await?;
        self.place_order().await
    }

    /// Orders one product as a guest.
    ///
    /// The guest starts from the `storefront-customer` dataset with the
    /// baseline salutation and country; `data` goes on top.
    #[instrument(skip(self, fixtures, data))]
    pub async fn create_guest_order(
        &mut self,
        fixtures: &FixtureService,
        product_id: &str,
        data: Value,
    ) -> FixtureResult<Value> {
        self.ensure_access_key(fixtures).await?;

        let salutation_filter = SearchFilter::equals("displayName", baseline::SALUTATION);
        let country_filter = SearchFilter::equals("iso", baseline::COUNTRY_ISO);
        let (salutation, country) = try_join!(
            fixtures.find("salutation", &salutation_filter),
            fixtures.find("country", &country_filter)
        )?;

        let guest = merge_all([
            fixtures
                .defaults()
                .get("storefront-customer")
                .cloned()
                .unwrap_or_else(|| json!({})),
            json!({
                "guest": true,
                "salutationId": salutation.id,
                "billingAddress": {
                    "salutationId": salutation.id,
                    "countryId": country.id,
                },
            }),
            data,
        ]);

        self.set_context_token(FixtureService::create_uuid());
        self.register(&guest).await?;
        self.add_product_to_cart(product_id).await?;
        self.place_order().await
    }
}
