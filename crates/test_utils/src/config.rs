//! Harness configuration read from environment-style variables.

use std::path::PathBuf;

use api_client::{ApiConfig, DEFAULT_ADMIN_API_PATH, DEFAULT_BASE_URL, DEFAULT_STORE_API_PATH};
use auth_handler::{
    AuthConfig, DEFAULT_CLIENT_ID, DEFAULT_GRANT_TYPE, DEFAULT_MIN_LIFETIME_MARGIN_SECS,
    DEFAULT_PASSWORD, DEFAULT_SCOPES, DEFAULT_USERNAME,
};
use secrecy::SecretString;
use test_cleanup::{DEFAULT_CLEANUP_PORT, DEFAULT_LOCALE};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Errors from reading the harness configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("{key} must be true or false, got '{value}'")]
    InvalidBool { key: String, value: String },
}

/// Everything a test run needs to reach the shop.
///
/// | key | default |
/// |-----|---------|
/// | `E2E_BASE_URL` | `http://localhost:8000` |
/// | `E2E_API_PATH` | `/api` |
/// | `E2E_API_VERSION` | unset |
/// | `E2E_STORE_API_PATH` | `/store-api` |
/// | `E2E_GRANT` | `password` |
/// | `E2E_CLIENT_ID` | `administration` |
/// | `E2E_SCOPE` | `write` |
/// | `E2E_USERNAME` or `E2E_USER` | `admin` |
/// | `E2E_PASSWORD` or `E2E_PASS` | `shopware` |
/// | `E2E_MIN_TOKEN_LIFETIME` | `60` |
/// | `E2E_LOCALE` | `en-GB` |
/// | `E2E_SALES_CHANNEL_NAME` | `Storefront` |
/// | `E2E_LOCAL_USAGE` | `false` |
/// | `E2E_SHOPWARE_ROOT` | `.` |
/// | `E2E_CLEANUP_PORT` | `8005` |
/// | `E2E_FIXTURES_DIR` | unset |
#[derive(Clone)]
pub struct HarnessConfig {
    pub base_url: String,
    pub api_path: String,
    pub api_version: Option<String>,
    pub store_api_path: String,
    pub grant_type: String,
    pub client_id: String,
    pub scopes: String,
    pub username: String,
    pub password: SecretString,
    pub min_token_lifetime: u64,
    pub locale: String,
    pub sales_channel_name: String,

    /// Restore the database through the local console instead of the cleanup server.
    pub local_usage: bool,
    pub shopware_root: PathBuf,
    pub cleanup_port: u16,

    /// Directory with dataset files overriding the built-in ones.
    pub fixtures_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_path: DEFAULT_ADMIN_API_PATH.to_string(),
            api_version: None,
            store_api_path: DEFAULT_STORE_API_PATH.to_string(),
            grant_type: DEFAULT_GRANT_TYPE.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            scopes: DEFAULT_SCOPES.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: SecretString::from(DEFAULT_PASSWORD),
            min_token_lifetime: DEFAULT_MIN_LIFETIME_MARGIN_SECS,
            locale: DEFAULT_LOCALE.to_string(),
            sales_channel_name: "Storefront".to_string(),
            local_usage: false,
            shopware_root: PathBuf::from("."),
            cleanup_port: DEFAULT_CLEANUP_PORT,
            fixtures_dir: None,
        }
    }
}

impl HarnessConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration from any key/value source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            base_url: get("E2E_BASE_URL").unwrap_or(defaults.base_url),
            api_path: get("E2E_API_PATH").unwrap_or(defaults.api_path),
            api_version: get("E2E_API_VERSION"),
            store_api_path: get("E2E_STORE_API_PATH").unwrap_or(defaults.store_api_path),
            grant_type: get("E2E_GRANT").unwrap_or(defaults.grant_type),
            client_id: get("E2E_CLIENT_ID").unwrap_or(defaults.client_id),
            scopes: get("E2E_SCOPE").unwrap_or(defaults.scopes),
            username: get("E2E_USERNAME")
                .or_else(|| get("E2E_USER"))
                .unwrap_or(defaults.username),
            password: get("E2E_PASSWORD")
                .or_else(|| get("E2E_PASS"))
                .map(SecretString::from)
                .unwrap_or(defaults.password),
            min_token_lifetime: parse_number(
                "E2E_MIN_TOKEN_LIFETIME",
                get("E2E_MIN_TOKEN_LIFETIME"),
                defaults.min_token_lifetime,
            )?,
            locale: get("E2E_LOCALE").unwrap_or(defaults.locale),
            sales_channel_name: get("E2E_SALES_CHANNEL_NAME")
                .unwrap_or(defaults.sales_channel_name),
            local_usage: parse_bool(
                "E2E_LOCAL_USAGE",
                get("E2E_LOCAL_USAGE"),
                defaults.local_usage,
            )?,
            shopware_root: get("E2E_SHOPWARE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.shopware_root),
            cleanup_port: parse_number(
                "E2E_CLEANUP_PORT",
                get("E2E_CLEANUP_PORT"),
                defaults.cleanup_port,
            )?,
            fixtures_dir: get("E2E_FIXTURES_DIR").map(PathBuf::from),
        })
    }

    pub fn admin_api(&self) -> ApiConfig {
        ApiConfig::admin(&self.base_url)
            .with_api_path(&self.api_path)
            .with_api_version(self.api_version.clone())
    }

    pub fn store_api(&self) -> ApiConfig {
        ApiConfig::store(&self.base_url).with_api_path(&self.store_api_path)
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            grant_type: self.grant_type.clone(),
            client_id: self.client_id.clone(),
            scopes: self.scopes.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            min_lifetime_margin: self.min_token_lifetime,
            ..AuthConfig::default()
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    key: &str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber {
                key: key.to_string(),
                value,
            }),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v == "true" || v == "1" => Ok(true),
        Some(v) if v == "false" || v == "0" => Ok(false),
        Some(_) => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: value.unwrap_or_default(),
        }),
    }
}

impl std::fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("base_url", &self.base_url)
            .field("api_path", &self.api_path)
            .field("api_version", &self.api_version)
            .field("store_api_path", &self.store_api_path)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("min_token_lifetime", &self.min_token_lifetime)
            .field("locale", &self.locale)
            .field("sales_channel_name", &self.sales_channel_name)
            .field("local_usage", &self.local_usage)
            .field("shopware_root", &self.shopware_root)
            .field("cleanup_port", &self.cleanup_port)
            .field("fixtures_dir", &self.fixtures_dir)
            .finish_non_exhaustive()
    }
}
