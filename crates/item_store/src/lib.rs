//! Reactive cache of the remote item collection.
//!
//! [`ItemStore`] owns the one live [`Snapshot`], routes every mutation through an
//! [`ItemRemote`] and republishes the new snapshot to all observers once the remote
//! side has confirmed it.

use std::sync::Arc;

use shared::{
    domain::{Item, ItemId},
    error::StoreError,
    protocol::{NewItemRequest, UpdateItemRequest},
};
use tracing::{info, warn};

pub mod error;
mod hub;
pub mod remote;

pub use error::RemoteSetupError;
pub use hub::{ItemsSubscription, Snapshot};
pub use remote::{HttpItemRemote, ItemRemote, RemoteSettings};

use hub::SnapshotHub;

pub struct ItemStore {
    remote: Arc<dyn ItemRemote>,
    hub: SnapshotHub,
}

impl ItemStore {
    /// Builds a store holding an empty snapshot. Nothing is fetched.
    pub fn new(remote: Arc<dyn ItemRemote>) -> Arc<Self> {
        Arc::new(Self {
            remote,
            hub: SnapshotHub::new(),
        })
    }

    /// Builds a store and spawns the initial full load on the current tokio runtime.
    ///
    /// Observers attached before the load resolves see the empty snapshot first.
    pub fn start(remote: Arc<dyn ItemRemote>) -> Arc<Self> {
        let store = Self::new(remote);
        let loader = Arc::clone(&store);
        tokio::spawn(async move {
            match loader.refresh().await {
                Ok(items) => info!(count = items.len(), "items: initial load complete"),
                Err(err) => match err.hint() {
                    Some(hint) => warn!("items: initial load failed: {err}; {hint}"),
                    None => warn!("items: initial load failed: {err}"),
                },
            }
        });
        store
    }

    /// Registers an observer that receives the current snapshot, then every later one.
    ///
    /// Delivery is unbounded: a subscription that is held but never polled keeps
    /// queueing every published snapshot. Drop it once the view is gone.
    pub fn observe_items(&self) -> ItemsSubscription {
        self.hub.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.hub.current()
    }

    pub fn observer_count(&self) -> usize {
        self.hub.observer_count()
    }

    pub async fn refresh(&self) -> Result<Snapshot, StoreError> {
        let items = self.remote.list().await?;
        Ok(self.hub.apply(|_| items))
    }

    /// Reads one item straight from the remote resource. The snapshot is not touched.
    pub async fn get(&self, id: ItemId) -> Result<Item, StoreError> {
        self.remote.fetch(id).await
    }

    /// Stores `draft` remotely and appends the server's copy, id included.
    pub async fn create(&self, draft: &Item) -> Result<Item, StoreError> {
        let created = self.remote.create(NewItemRequest::from(draft)).await?;
        self.hub.apply(|current| {
            let mut next = current.to_vec();
            next.push(created.clone());
            next
        });
        Ok(created)
    }

    /// Replaces the local entry for `id` in place with the server's representation.
    ///
    /// When no local entry has that id the snapshot is republished unchanged and the
    /// returned item stays invisible until the next refresh.
    pub async fn update(&self, id: ItemId, patch: &Item) -> Result<Item, StoreError> {
        let updated = self
            .remote
            .update(id, UpdateItemRequest::for_path(id, patch))
            .await?;
        self.hub.apply(|current| {
            let mut next = current.to_vec();
            if let Some(slot) = next.iter_mut().find(|item| item.id == id) {
                *slot = updated.clone();
            }
            next
        });
        Ok(updated)
    }

    pub async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        self.remote.delete(id).await?;
        self.hub.apply(|current| {
            current
                .iter()
                .filter(|item| item.id != id)
                .cloned()
                .collect()
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
