use serde::{Deserialize, Serialize};

use super::{Patch, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationType {
    Medicine,
    Appointment,
    System,
    Emergency,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Medicine => "medicine",
            NotificationType::Appointment => "appointment",
            NotificationType::System => "system",
            NotificationType::Emergency => "emergency",
        }
    }
}

/// A notification as the store holds it. `id` and `timestamp` are assigned by
/// the store, never by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub read: bool,
    #[serde(rename = "type")]
    pub kind: NotificationType,
}

/// Caller-supplied part of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
}

impl NewNotification {
    pub fn new(kind: NotificationType, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }
}

/// The only permitted edit on a stored notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkRead;

impl Patch for MarkRead {
    type Target = Notification;
}

impl Record for Notification {
    type Patch = MarkRead;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, _patch: MarkRead) {
        self.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_serializes_under_type_key() {
        let json = serde_json::to_value(NewNotification::new(
            NotificationType::Medicine,
            "Refill",
            "Aspirin is running low",
        ))
        .unwrap();
        assert_eq!(json["type"], "medicine");
        assert_eq!(json["title"], "Refill");
    }
}
