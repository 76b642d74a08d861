use tokio::sync::watch;

use crate::{
    models::Identity,
    registration::{RegistrationForm, RegistrationSnapshot, RegistrationStep},
    AppState,
};

/// Reads the last published state. Never waits on a step in progress.
pub async fn get_registration(state: &AppState) -> Result<RegistrationSnapshot, String> {
    Ok(state.registration_status.borrow().clone())
}

pub fn watch_registration(state: &AppState) -> watch::Receiver<RegistrationSnapshot> {
    state.registration_status.clone()
}

pub async fn set_registration_form(
    state: &AppState,
    form: RegistrationForm,
) -> Result<RegistrationSnapshot, String> {
    let mut flow = state.registration.lock().await;
    flow.set_form(form);
    Ok(flow.snapshot())
}

pub async fn submit_registration(state: &AppState) -> Result<RegistrationStep, String> {
    state
        .registration
        .lock()
        .await
        .submit_profile()
        .await
        .map_err(|e| e.to_string())
}

pub async fn verify_registration_code(state: &AppState, code: String) -> Result<Identity, String> {
    state
        .registration
        .lock()
        .await
        .verify_code(&code)
        .await
        .map_err(|e| e.to_string())
}

pub async fn resend_registration_code(state: &AppState) -> Result<(), String> {
    state
        .registration
        .lock()
        .await
        .resend_code()
        .await
        .map_err(|e| e.to_string())
}

pub async fn reset_registration(state: &AppState) -> Result<RegistrationSnapshot, String> {
    let mut flow = state.registration.lock().await;
    flow.reset();
    Ok(flow.snapshot())
}
