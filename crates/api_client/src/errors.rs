//! Error types for API client operations.
//!
//! Every failure keeps the request method and URL, and for non-2xx responses
//! the status code plus the parsed error body, so a failing fixture chain can
//! be diagnosed from the error alone.

use serde_json::Value;

use crate::HttpMethod;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while performing an API request.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The server answered with a non-2xx status code.
    ///
    /// `body` holds the parsed response body when the server sent one.
    #[error("{method} {url} failed with status {status}")]
    Status {
        method: HttpMethod,
        url: String,
        status: u16,
        body: Option<Value>,
    },

    /// The request could not be sent or its response could not be read.
    #[error("{method} {url} could not be completed: {source}")]
    Network {
        method: HttpMethod,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The configured endpoint is not a valid absolute URL.
    #[error("Invalid API endpoint '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl HttpError {
    /// The HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Network { source, .. } => source.status().map(|s| s.as_u16()),
            HttpError::InvalidUrl { .. } => None,
        }
    }

    /// The parsed error body, if one was received.
    pub fn body(&self) -> Option<&Value> {
        match self {
            HttpError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Whether the server answered with `401 Unauthorized`.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
