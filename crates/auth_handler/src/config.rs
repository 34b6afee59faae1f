//! Password grant settings.

use secrecy::SecretString;

pub const DEFAULT_GRANT_TYPE: &str = "password";
pub const DEFAULT_CLIENT_ID: &str = "administration";
pub const DEFAULT_SCOPES: &str = "write";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "shopware";
pub const DEFAULT_MIN_LIFETIME_MARGIN_SECS: u64 = 60;
pub const DEFAULT_TOKEN_PATH: &str = "/oauth/token";
pub const DEFAULT_VALIDATION_PATH: &str = "/_info/version";

/// Settings for obtaining and checking the admin bearer token.
#[derive(Clone)]
pub struct AuthConfig {
    pub grant_type: String,
    pub client_id: String,
    pub scopes: String,
    pub username: String,
    pub password: SecretString,

    /// A credential is replaced once fewer than this many seconds of its lifetime are left.
    pub min_lifetime_margin: u64,

    /// Token endpoint, relative to the admin API.
    pub token_path: String,

    /// Cheap authenticated endpoint used for liveness checks.
    pub validation_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            grant_type: DEFAULT_GRANT_TYPE.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            scopes: DEFAULT_SCOPES.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: SecretString::from(DEFAULT_PASSWORD),
            min_lifetime_margin: DEFAULT_MIN_LIFETIME_MARGIN_SECS,
            token_path: DEFAULT_TOKEN_PATH.to_string(),
            validation_path: DEFAULT_VALIDATION_PATH.to_string(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("min_lifetime_margin", &self.min_lifetime_margin)
            .field("token_path", &self.token_path)
            .field("validation_path", &self.validation_path)
            .finish()
    }
}
