//! Crate for talking to the shop's admin API and store API over HTTP.
//!
//! [`ApiClient`] wraps a `reqwest` client with a base endpoint and a set of
//! default headers. Every call performs exactly one request, waits for the full
//! body and hands back an [`ApiResponse`]. Nothing in this crate retries; the
//! caller decides what a failure means.
//!
//! The same client type serves both APIs. The admin flavour is configured with
//! [`ApiConfig::admin`] and authenticated by adding a bearer token per call,
//! the store flavour with [`ApiConfig::store`] and the `sw-access-key` /
//! `sw-context-token` headers.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use url::Url;

pub mod errors;
pub use errors::HttpError;

pub mod models;
pub use models::{ResolvedEntity, SearchFilter};

mod normalize;
pub use normalize::normalize_body;

pub use reqwest::header;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Default shop URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Path of the admin API relative to the shop URL.
pub const DEFAULT_ADMIN_API_PATH: &str = "/api";

/// Path of the store API relative to the shop URL.
pub const DEFAULT_STORE_API_PATH: &str = "/store-api";

/// Header carrying the sales channel access key on store API calls.
pub const ACCESS_KEY_HEADER: &str = "sw-access-key";

/// Header carrying the customer context token on store API calls.
pub const CONTEXT_TOKEN_HEADER: &str = "sw-context-token";

/// The HTTP methods the harness issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Where an [`ApiClient`] sends its requests.
///
/// The final endpoint is `{base_url}{api_path}` with `/{api_version}` appended
/// when a version is configured (older shop releases prefix every admin route
/// with `v1`, `v2`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Shop URL, e.g. `http://localhost:8000`.
    pub base_url: String,

    /// API path relative to the shop URL, e.g. `/api`.
    pub api_path: String,

    /// Optional API version segment.
    pub api_version: Option<String>,
}

impl ApiConfig {
    /// Configuration for the admin API of the shop at `base_url`.
    pub fn admin(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: DEFAULT_ADMIN_API_PATH.to_string(),
            api_version: None,
        }
    }

    /// Configuration for the store API of the shop at `base_url`.
    pub fn store(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: DEFAULT_STORE_API_PATH.to_string(),
            api_version: None,
        }
    }

    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    pub fn with_api_version(mut self, api_version: Option<String>) -> Self {
        self.api_version = api_version.filter(|v| !v.trim().is_empty());
        self
    }

    /// The full endpoint all request paths are resolved against.
    pub fn endpoint(&self) -> String {
        let mut endpoint = self.base_url.trim_end_matches('/').to_string();

        let api_path = self.api_path.trim_matches('/');
        if !api_path.is_empty() {
            endpoint.push('/');
            endpoint.push_str(api_path);
        }

        if let Some(version) = &self.api_version {
            endpoint.push('/');
            endpoint.push_str(version.trim_matches('/'));
        }

        endpoint
    }
}

/// A settled API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response headers.
    pub headers: HeaderMap,

    /// Parsed body. `Null` for an empty body, a JSON string when the body is not JSON.
    pub body: Value,
}

impl ApiResponse {
    /// The body after single-result unwrapping, see [`normalize_body`].
    pub fn data(&self) -> Value {
        normalize_body(&self.body)
    }

    /// Returns a response header as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// HTTP client bound to one API endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    default_headers: HeaderMap,
}

impl ApiClient {
    /// Creates a client for the endpoint described by `config`.
    ///
    /// The client always sends `Content-Type: application/json` and
    /// `Accept: application/json` unless a call overrides them.
    ///
    /// # Errors
    /// Returns `HttpError::InvalidUrl` if the endpoint is not a valid absolute URL.
    pub fn new(config: &ApiConfig) -> Result<Self, HttpError> {
        let endpoint = config.endpoint();
        let base_url = Url::parse(&endpoint).map_err(|e| HttpError::InvalidUrl {
            url: endpoint.clone(),
            reason: e.to_string(),
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            default_headers,
        })
    }

    /// Adds (or replaces) a header sent with every request.
    pub fn with_default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// The endpoint request paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path against the endpoint.
    ///
    /// `path` may or may not start with a slash and may carry a query string.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }

    fn merged_headers(&self, overrides: Option<&HeaderMap>) -> HeaderMap {
        let mut headers = self.default_headers.clone();
        if let Some(overrides) = overrides {
            for (name, value) in overrides.iter() {
                headers.insert(name.clone(), value.clone());
            }
        }
        headers
    }

    /// Performs a single request and waits for it to settle.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method.
    /// * `path` - Path relative to the configured endpoint.
    /// * `body` - Optional JSON payload.
    /// * `headers` - Per-call headers; they replace default headers of the same name.
    ///
    /// # Errors
    ///
    /// * `HttpError::Network` if the request could not be sent or the body not read.
    /// * `HttpError::Status` for any non-2xx response, carrying the parsed error body.
    #[instrument(skip(self, body, headers), fields(method = %method, path = %path))]
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        headers: Option<&HeaderMap>,
    ) -> Result<ApiResponse, HttpError> {
        let url = self.url_for(path);

        let mut builder = self
            .http
            .request(method.into(), &url)
            .headers(self.merged_headers(headers));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(url = %url, has_body = body.is_some(), "Sending API request");

        let response = builder.send().await.map_err(|source| {
            error!(url = %url, error = %source, "API request could not be sent");
            HttpError::Network {
                method,
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let text = response
            .text()
            .await
            .map_err(|source| HttpError::Network {
                method,
                url: url.clone(),
                source,
            })?;
        let body = parse_body(&text);

        if !status.is_success() {
            log_error_body(method, &url, status.as_u16(), &body);
            return Err(HttpError::Status {
                method,
                url,
                status: status.as_u16(),
                body: (!body.is_null()).then_some(body),
            });
        }

        debug!(status = status.as_u16(), "API request completed");

        Ok(ApiResponse {
            status: status.as_u16(),
            headers: response_headers,
            body,
        })
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }

    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn log_error_body(method: HttpMethod, url: &str, status: u16, body: &Value) {
    match body.get("errors").and_then(Value::as_array) {
        Some(errors) => {
            for err in errors {
                let code = err.get("code").and_then(Value::as_str).unwrap_or_default();
                let detail = err.get("detail").and_then(Value::as_str).unwrap_or_default();
                warn!(
                    method = %method,
                    url = url,
                    status = status,
                    code = code,
                    detail = detail,
                    "API returned an error"
                );
            }
        }
        None => warn!(
            method = %method,
            url = url,
            status = status,
            "API request failed"
        ),
    }
}
