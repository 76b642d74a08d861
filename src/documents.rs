//! Document-store seam and the profile document this app keeps per identity.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Merge top-level fields into an existing document instead of replacing it.
    pub merge: bool,
}

impl SetOptions {
    pub fn merge() -> Self {
        Self { merge: true }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        options: SetOptions,
    ) -> Result<()>;
}

/// `users/{uid}`. Registration writes name and phone; the session gate writes
/// a minimal version with `displayName` when it sees an unknown identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// ISO-8601.
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub has_completed_onboarding: bool,
}

impl ProfileDocument {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Shallow merge: top-level keys of `patch` overwrite those of `target`.
/// A non-object on either side is replaced wholesale.
pub fn merge_document(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                existing.insert(key, value);
            }
        }
        (target, patch) => *target = patch,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn merge_touches_only_given_fields() {
        let mut doc = json!({"email": "a@b.c", "hasCompletedOnboarding": false});
        merge_document(&mut doc, json!({"hasCompletedOnboarding": true}));
        assert_eq!(doc, json!({"email": "a@b.c", "hasCompletedOnboarding": true}));
    }

    #[test]
    fn profile_reads_missing_flag_as_false() {
        let profile = ProfileDocument::from_value(json!({"email": "a@b.c"})).unwrap();
        assert!(!profile.has_completed_onboarding);
    }
}
