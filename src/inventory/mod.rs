//! Inventory store and server sync
//!
//! All mutations go through the server and are followed by a full
//! list refresh; the local cache is never patched speculatively.

mod collection;
mod types;

use std::sync::{Arc, RwLock};

use reqwest::Client;

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::session::SessionManager;

pub use collection::InventoryCollection;
pub use types::*;

/// Client for the inventory resource
pub struct InventoryClient {
    /// API base URL, without a trailing slash
    base_url: String,

    /// HTTP client
    client: Client,

    /// Session supplying the bearer token
    session: Arc<SessionManager>,

    /// Cached copy of the remote collection
    collection: RwLock<InventoryCollection>,
}

impl InventoryClient {
    pub(crate) fn new(base_url: String, client: Client, session: Arc<SessionManager>) -> Self {
        Self {
            base_url,
            client,
            session,
            collection: RwLock::new(InventoryCollection::default()),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/inventory/", self.base_url)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/inventory/{}", self.base_url, id)
    }

    /// Bearer token of the active session, or `NotAuthenticated`
    /// without any network call
    fn bearer(&self) -> Result<String> {
        self.session.token().ok_or(Error::NotAuthenticated)
    }

    /// Apply the forced-logout side effect when a call observes 401
    fn check_session<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(Error::SessionExpired) = &result {
            self.session.handle_unauthorized();
            let mut cache = self.collection.write().unwrap();
            *cache = InventoryCollection::default();
        }
        result
    }

    /// Fetch the full collection and replace the cache wholesale
    pub async fn list(&self) -> Result<InventoryCollection> {
        let token = self.bearer()?;
        let result = Fetch::get(&self.client, &self.collection_url())
            .bearer_auth(&token)
            .execute::<Vec<InventoryItem>>()
            .await;
        let items = self.check_session(result)?;

        let mut cache = self.collection.write().unwrap();
        cache.replace(items);
        Ok(cache.clone())
    }

    /// Fetch a single item by id
    pub async fn get(&self, id: i64) -> Result<InventoryItem> {
        let token = self.bearer()?;
        let result = Fetch::get(&self.client, &self.item_url(id))
            .bearer_auth(&token)
            .execute::<InventoryItem>()
            .await;
        self.check_session(result)
    }

    /// Create an item from a draft.
    ///
    /// The draft is validated locally first; on server acceptance the
    /// cache is refreshed from the server before the created item is
    /// returned, so the optimistic copy is never the final state.
    pub async fn create(&self, draft: &ItemDraft) -> Result<InventoryItem> {
        draft.validate()?;
        let token = self.bearer()?;

        let result = Fetch::post(&self.client, &self.collection_url())
            .bearer_auth(&token)
            .json(draft)?
            .execute::<InventoryItem>()
            .await;
        let created = self.check_session(result)?;

        tracing::debug!(id = created.id, name = %created.name, "item created");
        self.list().await?;
        Ok(created)
    }

    /// Replace an item's mutable fields with a draft (full replace,
    /// not a partial patch)
    pub async fn update(&self, id: i64, draft: &ItemDraft) -> Result<InventoryItem> {
        draft.validate()?;
        let token = self.bearer()?;

        let result = Fetch::put(&self.client, &self.item_url(id))
            .bearer_auth(&token)
            .json(draft)?
            .execute::<InventoryItem>()
            .await;
        let updated = self.check_session(result)?;

        tracing::debug!(id, "item updated");
        self.list().await?;
        Ok(updated)
    }

    /// Delete an item by id.
    ///
    /// Callers are expected to have confirmed the action with the
    /// user; this method does not ask.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let token = self.bearer()?;

        let result = Fetch::delete(&self.client, &self.item_url(id))
            .bearer_auth(&token)
            .execute_empty()
            .await;
        self.check_session(result)?;

        tracing::debug!(id, "item deleted");
        self.list().await?;
        Ok(())
    }

    /// Snapshot of the cached collection
    pub fn collection(&self) -> InventoryCollection {
        self.collection.read().unwrap().clone()
    }

    /// Aggregates over the cached collection
    pub fn stats(&self) -> InventoryStats {
        self.collection.read().unwrap().stats()
    }

    /// Pure, network-free search over the cached collection
    pub fn search(&self, term: &str) -> InventoryCollection {
        self.collection.read().unwrap().search(term)
    }
}
