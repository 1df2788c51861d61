//! Stockroom client library
//!
//! A Rust client for the stockroom inventory API: bearer-token session
//! management, a server-synced inventory store, and a terminal
//! presentation layer built on ratatui.

pub mod config;
pub mod error;
pub mod fetch;
pub mod inventory;
pub mod session;
pub mod ui;

use std::sync::Arc;

use crate::config::ClientOptions;
use crate::error::Result;
use crate::inventory::InventoryClient;
use crate::session::{FileTokenStore, SessionManager, TokenStore};

/// The main entry point for the stockroom client
///
/// Process-scoped: constructed once at startup, `restore_session()`
/// called once, torn down never.
///
/// # Example
///
/// ```no_run
/// use stockroom::{Client, config::ClientOptions};
///
/// let options = ClientOptions::default().with_base_url("http://localhost:8000/api/v1");
/// let client = Client::new(options).unwrap();
/// ```
pub struct Client {
    /// HTTP client shared by all components
    pub http_client: reqwest::Client,

    /// Session manager owning the bearer token
    session: Arc<SessionManager>,

    /// Inventory store and sync client
    inventory: InventoryClient,

    /// Client options
    pub options: ClientOptions,
}

impl Client {
    /// Create a new client with a file-backed token store at the
    /// configured path
    pub fn new(options: ClientOptions) -> Result<Self> {
        let store = FileTokenStore::new(options.token_file.clone());
        Self::with_store(options, Box::new(store))
    }

    /// Create a new client with a custom token store
    pub fn with_store(options: ClientOptions, store: Box<dyn TokenStore>) -> Result<Self> {
        // Reject malformed base URLs up front rather than on first use.
        url::Url::parse(&options.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let base_url = options.base_url.trim_end_matches('/').to_string();
        let session = Arc::new(SessionManager::new(
            base_url.clone(),
            http_client.clone(),
            store,
        ));
        let inventory = InventoryClient::new(base_url, http_client.clone(), Arc::clone(&session));

        Ok(Self {
            http_client,
            session,
            inventory,
            options,
        })
    }

    /// The session manager
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// The inventory client
    pub fn inventory(&self) -> &InventoryClient {
        &self.inventory
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::inventory::{InventoryCollection, InventoryItem, InventoryStats, ItemDraft};
    pub use crate::session::Identity;
    pub use crate::Client;
}
