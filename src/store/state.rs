use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::models::{
    new_id, Appointment, Doctor, EmergencyContact, HealthMetrics, HealthMetricsPatch, Identity,
    Medicine, NewNotification, Notification, Record,
};

/// One immutable snapshot of everything the store holds.
///
/// Collections sit behind their own `Arc`, so a transition only reallocates the
/// collection it touches; the others are shared with the previous snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub user: Option<Identity>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub health_metrics: HealthMetrics,
    pub appointments: Arc<Vec<Appointment>>,
    pub medicines: Arc<Vec<Medicine>>,
    pub emergency_contacts: Arc<Vec<EmergencyContact>>,
    pub doctors: Arc<Vec<Doctor>>,
    pub notifications: Arc<Vec<Notification>>,
    /// Last timestamp handed to a notification; keeps timestamps non-decreasing
    /// even if the wall clock steps backwards.
    #[serde(skip)]
    last_notification_at: i64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
            health_metrics: HealthMetrics::default(),
            appointments: Arc::default(),
            medicines: Arc::default(),
            emergency_contacts: Arc::default(),
            doctors: Arc::default(),
            notifications: Arc::default(),
            last_notification_at: 0,
        }
    }
}

/// A record type with a dedicated collection in [`StoreState`].
pub trait Collection: Record + Send + Sync + 'static {
    fn items(state: &StoreState) -> &Arc<Vec<Self>>;

    fn items_mut(state: &mut StoreState) -> &mut Arc<Vec<Self>>;
}

macro_rules! collection {
    ($ty:ty, $field:ident) => {
        impl Collection for $ty {
            fn items(state: &StoreState) -> &Arc<Vec<Self>> {
                &state.$field
            }

            fn items_mut(state: &mut StoreState) -> &mut Arc<Vec<Self>> {
                &mut state.$field
            }
        }
    };
}

collection!(Appointment, appointments);
collection!(Medicine, medicines);
collection!(EmergencyContact, emergency_contacts);
collection!(Doctor, doctors);
collection!(Notification, notifications);

// Each transition below returns whether the snapshot changed. A `false` result
// means the state was left untouched and nothing needs publishing.
impl StoreState {
    pub fn collection<T: Collection>(&self) -> &[T] {
        T::items(self).as_slice()
    }

    pub(crate) fn set_user(&mut self, user: Option<Identity>) -> bool {
        self.is_authenticated = user.is_some();
        self.user = user;
        self.is_loading = false;
        true
    }

    pub(crate) fn set_health_metrics(&mut self, patch: HealthMetricsPatch) -> bool {
        let merged = self.health_metrics.merged(patch);
        if merged == self.health_metrics {
            return false;
        }
        self.health_metrics = merged;
        true
    }

    pub(crate) fn add<T: Collection>(&mut self, item: T) -> bool {
        let current = T::items(self);
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(item);
        *T::items_mut(self) = Arc::new(next);
        true
    }

    /// Merges `patch` over every entry whose id matches. Absent ids are a no-op.
    pub(crate) fn update<T: Collection>(&mut self, id: &str, patch: T::Patch) -> bool {
        let current = T::items(self);
        if !current.iter().any(|item| item.id() == id) {
            return false;
        }

        let next: Vec<T> = current
            .iter()
            .cloned()
            .map(|mut item| {
                if item.id() == id {
                    item.apply(patch.clone());
                }
                item
            })
            .collect();
        *T::items_mut(self) = Arc::new(next);
        true
    }

    pub(crate) fn delete<T: Collection>(&mut self, id: &str) -> bool {
        let current = T::items(self);
        if !current.iter().any(|item| item.id() == id) {
            return false;
        }

        let next: Vec<T> = current
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();
        *T::items_mut(self) = Arc::new(next);
        true
    }

    /// Appends a notification with a store-assigned id and timestamp. Returns the id.
    pub(crate) fn add_notification(&mut self, input: NewNotification) -> String {
        let timestamp = Utc::now().timestamp_millis().max(self.last_notification_at);
        self.last_notification_at = timestamp;

        let id = new_id();
        self.add(Notification {
            id: id.clone(),
            title: input.title,
            message: input.message,
            timestamp,
            read: false,
            kind: input.kind,
        });
        id
    }

    pub(crate) fn mark_notification_as_read(&mut self, id: &str) -> bool {
        let unread = self
            .notifications
            .iter()
            .any(|notification| notification.id == id && !notification.read);
        if !unread {
            return false;
        }
        self.update::<Notification>(id, crate::models::MarkRead)
    }

    pub(crate) fn clear_notifications(&mut self) -> bool {
        if self.notifications.is_empty() {
            return false;
        }
        self.notifications = Arc::default();
        true
    }
}
