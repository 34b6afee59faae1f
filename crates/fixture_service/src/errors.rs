use api_client::HttpError;
use auth_handler::AuthError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Result type for fixture operations
pub type FixtureResult<T> = std::result::Result<T, FixtureError>;

/// Errors raised while building fixtures.
///
/// HTTP and authentication failures are passed through unchanged so the
/// failing test shows the original status code and error body.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A lookup that fixture setup depends on matched nothing.
    #[error("No {entity} found where {field} is '{value}'")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    #[error("Invalid fixture input: {0}")]
    Validation(String),

    #[error("Fixture dataset error: {0}")]
    Dataset(String),

    /// The API answered successfully but without the data the flow needs.
    #[error("Unexpected response from {endpoint}: {reason}")]
    UnexpectedResponse { endpoint: String, reason: String },
}

impl FixtureError {
    /// The HTTP status code behind this error, if there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FixtureError::Http(e) => e.status(),
            FixtureError::Auth(AuthError::TokenRequest(e)) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FixtureError::NotFound { .. })
    }
}
