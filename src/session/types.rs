//! Types for authentication and session state

use serde::{Deserialize, Serialize};

/// Credentials sent to the login endpoint
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of the login endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The access token
    pub access_token: String,

    /// The token type, always `bearer`
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// User identity derived from the token payload.
///
/// Display-only: the payload is decoded without signature verification,
/// so this must never feed an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The username (`sub` claim)
    pub username: String,

    /// The user's role, when the payload carries one
    pub role: Option<String>,
}

/// Claims the backend puts into the token payload
#[derive(Debug, Deserialize)]
pub(crate) struct Claims {
    pub sub: Option<String>,
    pub role: Option<String>,
    #[allow(dead_code)]
    pub id: Option<i64>,
}

/// An active session
#[derive(Debug, Clone)]
pub struct Session {
    /// The access token, never empty
    pub access_token: String,

    /// Identity decoded from the token payload; `None` when the token
    /// is opaque to the client
    pub identity: Option<Identity>,
}
