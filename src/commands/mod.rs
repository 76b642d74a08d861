//! Page-level command handlers.
//!
//! Each handler takes the shared [`AppState`] and returns `Result<T, String>`,
//! the shape a UI bridge hands back to its front end. Store-backed pages refuse
//! to run without a signed-in identity.

pub mod appointments;
pub mod dashboard;
pub mod doctors;
pub mod emergency;
pub mod medicines;
pub mod notifications;
pub mod profile;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    models::{new_id, Identity, Record},
    routes::Route,
    store::Collection,
    AppState,
};

pub const NOT_SIGNED_IN: &str = "Please sign in to continue";

pub(crate) fn require_session(state: &AppState) -> Result<Identity, String> {
    state
        .store
        .snapshot()
        .user
        .clone()
        .ok_or_else(|| NOT_SIGNED_IN.to_string())
}

/// Turns a form payload into a record, minting an id when the payload has none.
pub(crate) fn record_from_draft<T: DeserializeOwned>(mut draft: Value) -> Result<T, String> {
    if let Value::Object(fields) = &mut draft {
        let has_id = fields
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|id| !id.is_empty());
        if !has_id {
            fields.insert("id".into(), Value::String(new_id()));
        }
    }
    serde_json::from_value(draft).map_err(|e| e.to_string())
}

pub(crate) fn list<T: Collection>(state: &AppState) -> Result<Vec<T>, String> {
    require_session(state)?;
    Ok(state.store.list::<T>())
}

pub(crate) fn create<T: Collection + DeserializeOwned>(
    state: &AppState,
    draft: Value,
) -> Result<T, String> {
    require_session(state)?;
    let record: T = record_from_draft(draft)?;
    record.validate().map_err(|err| err.to_string())?;
    state.store.add(record.clone());
    Ok(record)
}

/// Merges `patch` into the record with `id`. The merged result must still
/// pass validation; otherwise nothing is written. Unknown ids yield `None`.
pub(crate) fn modify<T: Collection>(
    state: &AppState,
    id: &str,
    patch: T::Patch,
) -> Result<Option<T>, String> {
    require_session(state)?;
    let Some(mut merged) = state.store.get::<T>(id) else {
        return Ok(None);
    };
    merged.apply(patch.clone());
    merged.validate().map_err(|err| err.to_string())?;
    state.store.update(id, patch);
    Ok(state.store.get::<T>(id))
}

pub(crate) fn remove<T: Collection>(state: &AppState, id: &str) -> Result<(), String> {
    require_session(state)?;
    state.store.delete::<T>(id);
    Ok(())
}

/// Navigates by path, applying the route guards. Unknown paths are an error.
pub async fn navigate(state: &AppState, path: String) -> Result<Route, String> {
    let route = Route::from_path(&path).ok_or_else(|| format!("Unknown page: {path}"))?;
    Ok(state.router.visit(route, &state.gate.session_view()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        config::{AppConfig, ConfigStore, EmailConfig},
        db::Database,
        email::EmailJsClient,
        identity::{IdentityProvider, MemoryIdentityProvider},
        models::{
            Appointment, Doctor, DoctorPatch, EmergencyContact, EmergencyContactPatch, Medicine,
            MedicinePatch,
        },
    };

    /// App state with `pat@example.com` signed in and mirrored into the store.
    pub(super) async fn signed_in_state() -> AppState {
        let provider = Arc::new(MemoryIdentityProvider::new());
        let state = AppState::new(
            ConfigStore::detached(AppConfig::default()),
            provider.clone(),
            Arc::new(Database::open_in_memory().unwrap()),
            Arc::new(EmailJsClient::new(&EmailConfig::default())),
        );
        let identity = provider
            .create_account("pat@example.com", "secret1")
            .await
            .unwrap();
        state.gate.handle_session_change(Some(identity)).await;
        state
    }

    #[tokio::test]
    async fn blank_required_fields_are_rejected_on_create() {
        let state = signed_in_state().await;

        let err = create::<Appointment>(
            &state,
            json!({"doctorName": "  ", "date": "2023-06-15", "time": "10:00:00"}),
        )
        .unwrap_err();
        assert_eq!(err, "Doctor name is required");

        let err = create::<Medicine>(
            &state,
            json!({
                "name": "",
                "dosage": "500mg",
                "frequency": "Daily",
                "timeToTake": "08:00:00",
                "expiryDate": "2030-01-01",
                "stock": 10,
            }),
        )
        .unwrap_err();
        assert_eq!(err, "Medicine name is required");

        let err = create::<Doctor>(
            &state,
            json!({"name": "Dr. Rao", "specialty": "Cardiologist", "phoneNumber": ""}),
        )
        .unwrap_err();
        assert_eq!(err, "Phone number is required");

        let err = create::<EmergencyContact>(
            &state,
            json!({"name": "Sam", "relationship": "", "phoneNumber": "555-0101"}),
        )
        .unwrap_err();
        assert_eq!(err, "Relationship is required");

        let snapshot = state.store.snapshot();
        assert!(snapshot.collection::<Appointment>().is_empty());
        assert!(snapshot.collection::<Medicine>().is_empty());
        assert!(snapshot.collection::<Doctor>().is_empty());
        assert!(snapshot.collection::<EmergencyContact>().is_empty());
    }

    #[tokio::test]
    async fn update_that_blanks_a_required_field_changes_nothing() {
        let state = signed_in_state().await;
        let doctor: Doctor = create(
            &state,
            json!({"id": "d1", "name": "Dr. Rao", "specialty": "Cardiologist", "phoneNumber": "555-0199"}),
        )
        .unwrap();

        let blanked = DoctorPatch {
            phone_number: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            modify::<Doctor>(&state, "d1", blanked).unwrap_err(),
            "Phone number is required"
        );
        assert_eq!(state.store.get::<Doctor>("d1"), Some(doctor));

        let renamed = DoctorPatch {
            name: Some("Dr. Iyer".into()),
            ..Default::default()
        };
        let updated = modify::<Doctor>(&state, "d1", renamed).unwrap().unwrap();
        assert_eq!(updated.name, "Dr. Iyer");
        assert_eq!(updated.phone_number, "555-0199");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_none() {
        let state = signed_in_state().await;
        let patch = MedicinePatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(modify::<Medicine>(&state, "missing", patch), Ok(None));

        let contact = EmergencyContactPatch {
            name: Some("Sam".into()),
            ..Default::default()
        };
        assert_eq!(modify::<EmergencyContact>(&state, "missing", contact), Ok(None));
    }

    #[test]
    fn draft_without_id_gets_one() {
        let contact: EmergencyContact = record_from_draft(json!({
            "name": "Sam",
            "relationship": "Brother",
            "phoneNumber": "555-0101",
        }))
        .unwrap();
        assert!(!contact.id.is_empty());

        let blank: EmergencyContact = record_from_draft(json!({
            "id": "",
            "name": "Sam",
            "relationship": "Brother",
            "phoneNumber": "555-0101",
        }))
        .unwrap();
        assert!(!blank.id.is_empty());
    }

    #[test]
    fn draft_id_is_kept() {
        let contact: EmergencyContact = record_from_draft(json!({
            "id": "c1",
            "name": "Sam",
            "relationship": "Brother",
            "phoneNumber": "555-0101",
        }))
        .unwrap();
        assert_eq!(contact.id, "c1");
    }

    #[test]
    fn malformed_draft_is_rejected() {
        let result: Result<EmergencyContact, String> = record_from_draft(json!({ "name": "Sam" }));
        assert!(result.is_err());
    }
}
