use serde_json::Value;

use super::{create, list, modify, remove};
use crate::{
    models::{Appointment, AppointmentPatch},
    AppState,
};

/// Appointments ordered by date, then time.
pub async fn get_appointments(state: &AppState) -> Result<Vec<Appointment>, String> {
    let mut appointments: Vec<Appointment> = list(state)?;
    appointments.sort_by_key(|appointment| (appointment.date, appointment.time));
    Ok(appointments)
}

pub async fn add_appointment(state: &AppState, draft: Value) -> Result<Appointment, String> {
    create(state, draft)
}

pub async fn update_appointment(
    state: &AppState,
    id: String,
    patch: AppointmentPatch,
) -> Result<Option<Appointment>, String> {
    modify::<Appointment>(state, &id, patch)
}

pub async fn delete_appointment(state: &AppState, id: String) -> Result<(), String> {
    remove::<Appointment>(state, &id)
}
