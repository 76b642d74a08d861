use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use super::{create, list, modify, remove, require_session};
use crate::{
    models::{Doctor, DoctorPatch},
    AppState,
};

const MAPS_URL: &str = "https://maps.google.com/";

/// Links the doctor card offers. Email and map links only exist when the
/// doctor has that detail on file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactActions {
    pub call: String,
    pub email: Option<String>,
    pub directions: Option<String>,
}

impl ContactActions {
    pub fn for_doctor(doctor: &Doctor) -> Self {
        Self {
            call: format!("tel:{}", doctor.phone_number),
            email: doctor
                .email
                .as_deref()
                .filter(|email| !email.is_empty())
                .map(|email| format!("mailto:{email}")),
            directions: doctor
                .address
                .as_deref()
                .filter(|address| !address.is_empty())
                .and_then(|address| Url::parse_with_params(MAPS_URL, &[("q", address)]).ok())
                .map(String::from),
        }
    }
}

pub async fn get_doctors(state: &AppState) -> Result<Vec<Doctor>, String> {
    list(state)
}

pub async fn add_doctor(state: &AppState, draft: Value) -> Result<Doctor, String> {
    create(state, draft)
}

pub async fn update_doctor(
    state: &AppState,
    id: String,
    patch: DoctorPatch,
) -> Result<Option<Doctor>, String> {
    modify::<Doctor>(state, &id, patch)
}

pub async fn delete_doctor(state: &AppState, id: String) -> Result<(), String> {
    remove::<Doctor>(state, &id)
}

pub async fn get_doctor_contact_actions(
    state: &AppState,
    id: String,
) -> Result<ContactActions, String> {
    require_session(state)?;
    state
        .store
        .get::<Doctor>(&id)
        .map(|doctor| ContactActions::for_doctor(&doctor))
        .ok_or_else(|| format!("Doctor {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor() -> Doctor {
        Doctor {
            id: "d1".into(),
            name: "Dr. Rao".into(),
            specialty: "Cardiologist".into(),
            phone_number: "555-0199".into(),
            address: None,
            email: None,
        }
    }

    #[test]
    fn phone_only_doctor_has_call_link() {
        let actions = ContactActions::for_doctor(&doctor());
        assert_eq!(actions.call, "tel:555-0199");
        assert_eq!(actions.email, None);
        assert_eq!(actions.directions, None);
    }

    #[test]
    fn address_is_query_encoded() {
        let actions = ContactActions::for_doctor(&Doctor {
            address: Some("12 Main St, Pune".into()),
            email: Some("rao@clinic.test".into()),
            ..doctor()
        });
        assert_eq!(actions.email.as_deref(), Some("mailto:rao@clinic.test"));
        assert_eq!(
            actions.directions.as_deref(),
            Some("https://maps.google.com/?q=12+Main+St%2C+Pune")
        );
    }
}
