//! Entity records held by the store.
//!
//! Every collection entity implements [`Record`]: it exposes its id and knows how
//! to merge a partial patch over itself. Patches carry `Option` fields; `None`
//! leaves the existing value in place.

pub mod appointment;
pub mod doctor;
pub mod emergency_contact;
pub mod health;
pub mod identity;
pub mod medicine;
pub mod notification;

pub use appointment::{Appointment, AppointmentPatch};
pub use doctor::{Doctor, DoctorPatch};
pub use emergency_contact::{EmergencyContact, EmergencyContactPatch};
pub use health::{HealthMetrics, HealthMetricsPatch};
pub use identity::Identity;
pub use medicine::{Medicine, MedicinePatch};
pub use notification::{MarkRead, NewNotification, Notification, NotificationType};

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
}

pub trait Record: Clone {
    type Patch: Patch<Target = Self>;

    fn id(&self) -> &str;

    fn apply(&mut self, patch: Self::Patch);

    /// Checks the fields a form marks required. Runs on every create and on
    /// the merged result of every update.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Fails when `value` is empty or only whitespace.
pub(crate) fn require(label: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing(label));
    }
    Ok(())
}

/// Partial update for a [`Record`]. The associated target lets callers pass a
/// patch without naming the entity type.
pub trait Patch: Clone {
    type Target: Record<Patch = Self>;
}

/// Random client-side identifier for a new entity.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
