//! Error handling for the stockroom client

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the stockroom client
#[derive(Error, Debug)]
pub enum Error {
    /// A draft field failed local validation; no request was issued
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Operation requires a session but none is active
    #[error("not authenticated")]
    NotAuthenticated,

    /// The login endpoint rejected the supplied credentials
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The server answered 401 on an authenticated call; the session
    /// has been terminated as a side effect
    #[error("session expired")]
    SessionExpired,

    /// Network failure: the server could not be reached
    #[error("could not reach the server")]
    Unreachable,

    /// The server answered with a non-success status
    #[error("server rejected the request ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// The requested resource does not exist
    #[error("not found")]
    NotFound,

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Token persistence errors
    #[error("token store error: {0}")]
    TokenStore(String),
}

impl Error {
    /// Create a new validation error for a named draft field
    pub fn validation<T: fmt::Display>(field: &'static str, reason: T) -> Self {
        Error::Validation {
            field,
            reason: reason.to_string(),
        }
    }

    /// Create a new token store error
    pub fn token_store<T: fmt::Display>(msg: T) -> Self {
        Error::TokenStore(msg.to_string())
    }

    /// Field name for validation errors, `None` otherwise
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
