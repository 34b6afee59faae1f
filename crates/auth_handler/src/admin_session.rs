//! Admin API session backed by a password grant.

use std::sync::Arc;

use api_client::header::{HeaderMap, AUTHORIZATION};
use api_client::{ApiClient, HttpMethod};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    AuthConfig, AuthError, AuthResult, Clock, Credential, SessionAuthenticator, SessionStore,
    SystemClock, TokenResponse, BEARER_SESSION,
};

#[cfg(test)]
#[path = "admin_session_tests.rs"]
mod tests;

/// Admin session
///
/// Obtains bearer tokens from the admin API's token endpoint and caches them
/// under [`BEARER_SESSION`].
///
/// Token requests are not serialized: two overlapping [`authenticate`] calls
/// that both miss the cache each issue a token request, and the one finishing
/// last owns the cache slot.
///
/// # Examples
///
/// ```rust,no_run
/// use api_client::{ApiClient, ApiConfig};
/// use auth_handler::{AdminSession, AuthConfig, SessionAuthenticator};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new(&ApiConfig::admin("http://localhost:8000"))?;
/// let session = AdminSession::new(client, AuthConfig::default());
///
/// let credential = session.authenticate().await?;
/// println!("Token valid until {}", credential.expiry);
/// # Ok(())
/// # }
/// ```
///
/// [`authenticate`]: SessionAuthenticator::authenticate
pub struct AdminSession {
    client: ApiClient,
    config: RwLock<AuthConfig>,
    store: SessionStore,
    clock: Arc<dyn Clock>,
}

impl AdminSession {
    /// Creates a session using the system clock.
    pub fn new(client: ApiClient, config: AuthConfig) -> Self {
        Self::with_clock(client, config, Arc::new(SystemClock))
    }

    /// Creates a session with an explicit time source.
    pub fn with_clock(client: ApiClient, config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            config: RwLock::new(config),
            store: SessionStore::new(),
            clock,
        }
    }

    /// The currently cached credential, fresh or not.
    pub async fn cached_credential(&self) -> Option<Credential> {
        self.store.get(BEARER_SESSION).await
    }

    /// Switches to another admin account.
    ///
    /// The cached credential is dropped; the next call to
    /// [`SessionAuthenticator::authenticate`] logs in with the new account.
    #[instrument(skip(self, password))]
    pub async fn login_as(&self, username: &str, password: SecretString) {
        {
            let mut config = self.config.write().await;
            config.username = username.to_string();
            config.password = password;
        }
        self.store.remove(BEARER_SESSION).await;

        info!(username = username, "Switched admin account, session reset");
    }

    async fn request_token(&self) -> AuthResult<Credential> {
        let (token_path, body) = {
            let config = self.config.read().await;
            let body = json!({
                "grant_type": config.grant_type,
                "client_id": config.client_id,
                "scopes": config.scopes,
                "username": config.username,
                "password": config.password.expose_secret(),
            });
            (config.token_path.clone(), body)
        };

        info!(token_path = %token_path, "Requesting admin access token");

        let response = self
            .client
            .request(HttpMethod::Post, &token_path, Some(&body), None)
            .await
            .map_err(|e| {
                error!(error = %e, "Admin token request failed");
                AuthError::TokenRequest(e)
            })?;

        let token: TokenResponse = serde_json::from_value(response.body).map_err(|e| {
            error!(error = %e, "Token endpoint returned an unexpected body");
            AuthError::InvalidTokenResponse(e.to_string())
        })?;

        let credential = Credential::from_token_response(token, self.clock.now()).map_err(|e| {
            error!(error = %e, "Token endpoint returned an unusable lifetime");
            e
        })?;

        info!(expires_at = credential.expiry, "Obtained admin access token");

        Ok(credential)
    }
}

#[async_trait]
impl SessionAuthenticator for AdminSession {
    #[instrument(skip(self))]
    async fn authenticate(&self) -> AuthResult<Credential> {
        let margin = self.config.read().await.min_lifetime_margin;

        if let Some(cached) = self.store.get(BEARER_SESSION).await {
            if cached.is_fresh(self.clock.now(), margin) {
                debug!(expires_at = cached.expiry, "Using cached admin credential");
                return Ok(cached);
            }

            info!(
                expires_at = cached.expiry,
                margin_secs = margin,
                "Cached admin credential is stale, re-authenticating"
            );
        }

        let credential = self.request_token().await?;
        self.store.put(BEARER_SESSION, credential.clone()).await;

        Ok(credential)
    }

    #[instrument(skip(self))]
    async fn validate(&self) -> AuthResult<bool> {
        let Some(credential) = self.store.get(BEARER_SESSION).await else {
            debug!("No cached admin credential to validate");
            return Ok(false);
        };

        let validation_path = self.config.read().await.validation_path.clone();

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, credential.authorization_header()?);

        match self
            .client
            .request(HttpMethod::Get, &validation_path, None, Some(&headers))
            .await
        {
            Ok(_) => {
                debug!("Admin session is alive");
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Admin session check failed, dropping cached credential");
                self.invalidate().await;
                Ok(false)
            }
        }
    }

    async fn invalidate(&self) {
        if self.store.remove(BEARER_SESSION).await.is_some() {
            debug!("Cached admin credential removed");
        }
    }
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("endpoint", &self.client.base_url().as_str())
            .field("clock", &self.clock)
            .finish()
    }
}
