use serde::Serialize;
use serde_json::Value;

use super::{create, list, modify, remove, require_session};
use crate::{
    models::{EmergencyContact, EmergencyContactPatch},
    AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyService {
    pub id: &'static str,
    pub name: &'static str,
    pub number: &'static str,
}

pub const EMERGENCY_SERVICES: [EmergencyService; 2] = [
    EmergencyService {
        id: "emergency",
        name: "Emergency Services",
        number: "112",
    },
    EmergencyService {
        id: "women-helpline",
        name: "Women Helpline",
        number: "1091",
    },
];

pub fn call_link(phone_number: &str) -> String {
    format!("tel:{phone_number}")
}

/// Public numbers; shown even before any contact is added.
pub async fn get_emergency_services(state: &AppState) -> Result<Vec<EmergencyService>, String> {
    require_session(state)?;
    Ok(EMERGENCY_SERVICES.to_vec())
}

pub async fn get_emergency_contacts(state: &AppState) -> Result<Vec<EmergencyContact>, String> {
    list(state)
}

pub async fn add_emergency_contact(
    state: &AppState,
    draft: Value,
) -> Result<EmergencyContact, String> {
    create(state, draft)
}

pub async fn update_emergency_contact(
    state: &AppState,
    id: String,
    patch: EmergencyContactPatch,
) -> Result<Option<EmergencyContact>, String> {
    modify::<EmergencyContact>(state, &id, patch)
}

pub async fn delete_emergency_contact(state: &AppState, id: String) -> Result<(), String> {
    remove::<EmergencyContact>(state, &id)
}

pub async fn call_emergency_contact(state: &AppState, id: String) -> Result<String, String> {
    require_session(state)?;
    state
        .store
        .get::<EmergencyContact>(&id)
        .map(|contact| call_link(&contact.phone_number))
        .ok_or_else(|| format!("Contact {id} not found"))
}
