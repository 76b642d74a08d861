//! Session-wide application store.
//!
//! `Store` is a cheap, cloneable handle. All mutations are synchronous: each one
//! derives a new [`StoreState`] from the current one and publishes it to every
//! subscriber before returning. Operations against an absent id are silent
//! no-ops and publish nothing.

pub mod state;

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{HealthMetricsPatch, Identity, NewNotification, Notification, Patch};

pub use state::{Collection, StoreState};

#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<Arc<StoreState>>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(StoreState::default()));
        Self { tx: Arc::new(tx) }
    }

    /// Current snapshot. Holding it never blocks writers.
    pub fn snapshot(&self) -> Arc<StoreState> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreState>> {
        self.tx.subscribe()
    }

    fn commit<F>(&self, transition: F) -> bool
    where
        F: FnOnce(&mut StoreState) -> bool,
    {
        self.tx.send_if_modified(|current| {
            let mut next = StoreState::clone(current);
            if transition(&mut next) {
                *current = Arc::new(next);
                true
            } else {
                false
            }
        })
    }

    pub fn set_user(&self, user: Option<Identity>) {
        self.commit(|state| state.set_user(user));
    }

    pub fn set_health_metrics(&self, patch: HealthMetricsPatch) {
        self.commit(|state| state.set_health_metrics(patch));
    }

    /// Appends `item` verbatim. Ids are not checked for uniqueness.
    pub fn add<T: Collection>(&self, item: T) {
        self.commit(|state| state.add(item));
    }

    pub fn update<P>(&self, id: &str, patch: P)
    where
        P: Patch,
        P::Target: Collection,
    {
        self.commit(|state| state.update::<P::Target>(id, patch));
    }

    pub fn delete<T: Collection>(&self, id: &str) {
        self.commit(|state| state.delete::<T>(id));
    }

    pub fn list<T: Collection>(&self) -> Vec<T> {
        self.snapshot().collection::<T>().to_vec()
    }

    pub fn get<T: Collection>(&self, id: &str) -> Option<T> {
        self.snapshot()
            .collection::<T>()
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Returns the id the store assigned.
    pub fn add_notification(&self, input: NewNotification) -> String {
        let mut assigned = String::new();
        self.commit(|state| {
            assigned = state.add_notification(input);
            true
        });
        assigned
    }

    pub fn mark_notification_as_read(&self, id: &str) {
        self.commit(|state| state.mark_notification_as_read(id));
    }

    pub fn delete_notification(&self, id: &str) {
        self.delete::<Notification>(id);
    }

    pub fn clear_notifications(&self) {
        self.commit(|state| state.clear_notifications());
    }
}
