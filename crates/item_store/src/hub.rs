//! Snapshot fan-out owned by the store.

use std::{
    collections::HashMap,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, Weak},
    task::{Context, Poll},
};

use futures::Stream;
use shared::domain::Item;
use tokio::sync::mpsc;

/// Immutable view of the whole collection at one instant.
pub type Snapshot = Arc<[Item]>;

struct HubState {
    current: Snapshot,
    observers: HashMap<u64, mpsc::UnboundedSender<Snapshot>>,
    next_observer_id: u64,
}

pub(crate) struct SnapshotHub {
    state: Arc<Mutex<HubState>>,
}

impl SnapshotHub {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState {
                current: Arc::from(Vec::new()),
                observers: HashMap::new(),
                next_observer_id: 0,
            })),
        }
    }

    pub(crate) fn current(&self) -> Snapshot {
        Arc::clone(&lock_state(&self.state).current)
    }

    pub(crate) fn observer_count(&self) -> usize {
        lock_state(&self.state).observers.len()
    }

    pub(crate) fn subscribe(&self) -> ItemsSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = lock_state(&self.state);
        let id = state.next_observer_id;
        state.next_observer_id += 1;
        // Replay and registration share the lock so no publish lands in between.
        let _ = tx.send(Arc::clone(&state.current));
        state.observers.insert(id, tx);

        ItemsSubscription {
            id,
            rx,
            hub: Arc::downgrade(&self.state),
        }
    }

    /// Computes the next snapshot from the current one, installs it and hands it to
    /// every registered observer in one critical section.
    pub(crate) fn apply<F>(&self, next: F) -> Snapshot
    where
        F: FnOnce(&[Item]) -> Vec<Item>,
    {
        let mut state = lock_state(&self.state);
        let snapshot: Snapshot = next(&state.current[..]).into();
        state.current = Arc::clone(&snapshot);
        state
            .observers
            .retain(|_, tx| tx.send(Arc::clone(&snapshot)).is_ok());
        snapshot
    }
}

fn lock_state(state: &Mutex<HubState>) -> MutexGuard<'_, HubState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Registration in the store's fan-out list.
///
/// Yields the snapshot current at registration time first, then every later one.
/// Dropping the subscription detaches it; nothing else in the store is affected.
/// Undelivered snapshots queue up without bound until they are read or the
/// subscription is dropped.
pub struct ItemsSubscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<Snapshot>,
    hub: Weak<Mutex<HubState>>,
}

impl ItemsSubscription {
    /// Waits for the next snapshot. Returns `None` only once the store is gone.
    pub async fn next_snapshot(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }

    /// Returns an already delivered snapshot without waiting.
    pub fn try_next_snapshot(&mut self) -> Option<Snapshot> {
        self.rx.try_recv().ok()
    }

    pub fn unsubscribe(self) {}
}

impl Stream for ItemsSubscription {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Snapshot>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for ItemsSubscription {
    fn drop(&mut self) {
        if let Some(state) = self.hub.upgrade() {
            lock_state(&state).observers.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ItemId;

    fn item(id: i64) -> Item {
        Item {
            id: ItemId(id),
            name: format!("item-{id}"),
            description: format!("description-{id}"),
        }
    }

    #[test]
    fn subscribe_replays_current_snapshot() {
        let hub = SnapshotHub::new();
        hub.apply(|_| vec![item(1)]);

        let mut sub = hub.subscribe();
        let replayed = sub.try_next_snapshot().expect("replay");
        assert_eq!(&*replayed, &[item(1)]);
        assert!(sub.try_next_snapshot().is_none());
    }

    #[test]
    fn apply_builds_on_installed_snapshot() {
        let hub = SnapshotHub::new();
        hub.apply(|_| vec![item(1)]);
        let next = hub.apply(|current| {
            let mut next = current.to_vec();
            next.push(item(2));
            next
        });
        assert_eq!(&*next, &[item(1), item(2)]);
        assert_eq!(&*hub.current(), &[item(1), item(2)]);
    }

    #[test]
    fn dropping_subscription_detaches_it() {
        let hub = SnapshotHub::new();
        let first = hub.subscribe();
        let _second = hub.subscribe();
        assert_eq!(hub.observer_count(), 2);

        drop(first);
        assert_eq!(hub.observer_count(), 1);
    }

    #[test]
    fn unread_subscription_queues_every_snapshot_until_dropped() {
        let hub = SnapshotHub::new();
        let mut idle = hub.subscribe();
        for id in 1..=3 {
            hub.apply(|current| {
                let mut next = current.to_vec();
                next.push(item(id));
                next
            });
        }

        let mut lens = Vec::new();
        while let Some(snapshot) = idle.try_next_snapshot() {
            lens.push(snapshot.len());
        }
        assert_eq!(lens, vec![0, 1, 2, 3]);

        drop(idle);
        assert_eq!(hub.observer_count(), 0);
        hub.apply(|_| vec![item(9)]);
    }

    #[test]
    fn subscription_outliving_hub_drops_cleanly() {
        let hub = SnapshotHub::new();
        let mut sub = hub.subscribe();
        drop(hub);

        assert!(sub.try_next_snapshot().is_some());
        assert!(sub.try_next_snapshot().is_none());
        drop(sub);
    }
}
