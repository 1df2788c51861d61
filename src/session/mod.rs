//! Session management: login, logout, restore, identity
//!
//! The session moves between exactly two states: `LoggedOut` and
//! `LoggedIn`. `LoggedIn` is entered only with a non-empty token, and
//! left on logout or on the first 401 observed by any call.

mod store;
mod token;
mod types;

use std::sync::RwLock;

use reqwest::Client;

use crate::error::{Error, Result};
use crate::fetch::Fetch;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::decode_identity;
pub use types::*;

/// Owns the bearer token, its persistence, and the identity derived
/// from it
pub struct SessionManager {
    /// API base URL, without a trailing slash
    base_url: String,

    /// HTTP client used for requests
    client: Client,

    /// The current session
    session: RwLock<Option<Session>>,

    /// Durable token persistence
    store: Box<dyn TokenStore>,
}

impl SessionManager {
    /// Create a new session manager in the `LoggedOut` state
    pub(crate) fn new(base_url: String, client: Client, store: Box<dyn TokenStore>) -> Self {
        Self {
            base_url,
            client,
            session: RwLock::new(None),
            store,
        }
    }

    fn login_url(&self) -> String {
        format!("{}/users/login", self.base_url)
    }

    /// Authenticate against the login endpoint.
    ///
    /// On success the token is stored in memory and in the durable
    /// store, and the decoded session is returned. Any non-success
    /// HTTP status maps to [`Error::InvalidCredentials`]; a network
    /// failure maps to [`Error::Unreachable`]. Empty credentials are
    /// rejected locally before any request is made.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        if username.trim().is_empty() {
            return Err(Error::validation("username", "must not be empty"));
        }
        if password.is_empty() {
            return Err(Error::validation("password", "must not be empty"));
        }

        tracing::debug!(username, "logging in");

        let result = Fetch::post(&self.client, &self.login_url())
            .json(&LoginRequest { username, password })?
            .execute::<TokenResponse>()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(Error::Unreachable) => return Err(Error::Unreachable),
            Err(Error::Json(e)) => return Err(Error::Json(e)),
            // Any rejection status, 401 included, means bad credentials here.
            Err(_) => return Err(Error::InvalidCredentials),
        };

        if response.access_token.is_empty() {
            return Err(Error::InvalidCredentials);
        }

        let session = Session {
            identity: decode_identity(&response.access_token),
            access_token: response.access_token,
        };

        if let Err(e) = self.store.save(&session.access_token) {
            tracing::warn!(error = %e, "failed to persist session token");
        }

        let mut current = self.session.write().unwrap();
        *current = Some(session.clone());

        Ok(session)
    }

    /// Clear the session and the persisted token. Idempotent.
    pub fn logout(&self) {
        let mut current = self.session.write().unwrap();
        if current.take().is_some() {
            tracing::debug!("logged out");
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to remove persisted token");
        }
    }

    /// Restore a persisted session on startup.
    ///
    /// A stored token optimistically transitions the session to
    /// `LoggedIn`; an expired token is only discovered when the first
    /// authenticated request comes back 401.
    pub fn restore_session(&self) -> Option<Session> {
        let token = match self.store.load() {
            Ok(token) => token?,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted token");
                return None;
            }
        };

        let session = Session {
            identity: decode_identity(&token),
            access_token: token,
        };

        let mut current = self.session.write().unwrap();
        *current = Some(session.clone());
        Some(session)
    }

    /// Identity of the current user, if any. Pure read, never fails.
    pub fn current_identity(&self) -> Option<Identity> {
        let current = self.session.read().unwrap();
        current.as_ref().and_then(|s| s.identity.clone())
    }

    /// The current bearer token, if a session is active
    pub fn token(&self) -> Option<String> {
        let current = self.session.read().unwrap();
        current.as_ref().map(|s| s.access_token.clone())
    }

    /// Whether a session is active
    pub fn is_authenticated(&self) -> bool {
        self.session.read().unwrap().is_some()
    }

    /// Forced-logout side effect applied whenever any authenticated
    /// call observes a 401
    pub fn handle_unauthorized(&self) {
        tracing::warn!("server answered 401, terminating session");
        self.logout();
    }
}
