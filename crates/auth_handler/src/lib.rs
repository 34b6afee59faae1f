//! Authentication and session handling for the admin API.
//!
//! This crate owns the admin bearer credential. It obtains it with a password
//! grant, caches it in an in-memory session store and hands it out again until
//! it gets close to its expiry.
//!
//! ## Architecture
//!
//! - [`SessionAuthenticator`] is the interface fixture code depends on.
//! - [`AdminSession`] implements it on top of [`api_client::ApiClient`].
//! - [`Clock`] abstracts the current time so expiry handling can be tested.
//!
//! ## Lifecycle
//!
//! `Unauthenticated -> Authenticating -> Authenticated -> (Stale) -> Authenticating`
//!
//! A cached credential is used as long as `now < expiry - margin`. A failed
//! liveness check ([`SessionAuthenticator::validate`]) drops it, and so does
//! switching accounts with [`AdminSession::login_as`].

use async_trait::async_trait;

mod admin_session;
mod clock;
mod config;
mod credential;
mod session_store;

pub use admin_session::AdminSession;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    AuthConfig, DEFAULT_CLIENT_ID, DEFAULT_GRANT_TYPE, DEFAULT_MIN_LIFETIME_MARGIN_SECS,
    DEFAULT_PASSWORD, DEFAULT_SCOPES, DEFAULT_TOKEN_PATH, DEFAULT_USERNAME,
    DEFAULT_VALIDATION_PATH,
};
pub use credential::{Credential, TokenResponse};
pub use session_store::{SessionStore, BEARER_SESSION};

/// Result type for authentication operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Errors that can occur during authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token endpoint could not be reached or rejected the request.
    #[error("Token request failed: {0}")]
    TokenRequest(#[source] api_client::HttpError),

    /// The token endpoint answered with something that is not a token.
    #[error("Token endpoint returned an unexpected response: {0}")]
    InvalidTokenResponse(String),
}

/// Admin session interface
///
/// Supplies the bearer credential for admin API requests and keeps it fresh.
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    /// Returns a usable credential.
    ///
    /// A cached credential that is still fresh is returned without any network
    /// call. Otherwise a new token is requested and cached.
    ///
    /// # Errors
    /// Returns `AuthError::TokenRequest` if the token request fails and
    /// `AuthError::InvalidTokenResponse` if the response is not a token.
    async fn authenticate(&self) -> AuthResult<Credential>;

    /// Checks that the cached credential is still accepted by the server.
    ///
    /// Any non-success answer drops the cached credential so the next
    /// [`authenticate`](Self::authenticate) requests a new one.
    ///
    /// # Returns
    /// `true` if the session is alive, `false` if there was no credential or
    /// the server rejected it.
    async fn validate(&self) -> AuthResult<bool>;

    /// Drops the cached credential.
    async fn invalidate(&self);
}
