//! The cached admin credential.

use api_client::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{AuthError, AuthResult};

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;

/// Body of a successful token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Lifetime in seconds.
    pub expires_in: i64,

    #[serde(default)]
    pub token_type: Option<String>,
}

/// A bearer credential with its expiry.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,

    /// Expiry as unix seconds.
    pub expiry: i64,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>, expiry: i64) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: refresh_token.map(SecretString::from),
            expiry,
        }
    }

    /// Builds a credential from a token response received at `now`.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidTokenResponse` if `expires_in` is not positive
    /// or the resulting expiry does not fit a unix timestamp.
    pub fn from_token_response(response: TokenResponse, now: i64) -> AuthResult<Self> {
        if response.expires_in <= 0 {
            return Err(AuthError::InvalidTokenResponse(format!(
                "expires_in must be positive, got {}",
                response.expires_in
            )));
        }
        let expiry = now.checked_add(response.expires_in).ok_or_else(|| {
            AuthError::InvalidTokenResponse(format!(
                "expires_in {} overflows the expiry timestamp",
                response.expires_in
            ))
        })?;

        Ok(Self::new(response.access_token, response.refresh_token, expiry))
    }

    /// Whether the credential may still be handed out at `now`.
    pub fn is_fresh(&self, now: i64, margin_secs: u64) -> bool {
        let margin = i64::try_from(margin_secs).unwrap_or(i64::MAX);
        now < self.expiry.saturating_sub(margin)
    }

    /// The `Authorization` header value for this credential.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidTokenResponse` if the token contains characters
    /// that are not allowed in a header.
    pub fn authorization_header(&self) -> AuthResult<HeaderValue> {
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", self.access_token.expose_secret()))
                .map_err(|e| AuthError::InvalidTokenResponse(e.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}
