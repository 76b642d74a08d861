use crate::{
    onboarding::{Advance, OnboardingField, OnboardingSnapshot},
    routes::Route,
    AppState,
};

/// Opens the wizard, or wherever the visitor is sent instead.
pub async fn open_onboarding(state: &AppState) -> Result<Route, String> {
    let session = state.gate.session_view();
    Ok(state.router.visit(Route::Onboarding, &session))
}

pub async fn get_onboarding_state(state: &AppState) -> Result<OnboardingSnapshot, String> {
    Ok(state.onboarding.lock().await.snapshot())
}

pub async fn set_onboarding_field(
    state: &AppState,
    field: OnboardingField,
    value: String,
) -> Result<OnboardingSnapshot, String> {
    let mut wizard = state.onboarding.lock().await;
    wizard.set_field(field, value);
    Ok(wizard.snapshot())
}

pub async fn next_onboarding_step(state: &AppState) -> Result<Advance, String> {
    state
        .onboarding
        .lock()
        .await
        .advance()
        .await
        .map_err(|e| e.to_string())
}

pub async fn previous_onboarding_step(state: &AppState) -> Result<OnboardingSnapshot, String> {
    let mut wizard = state.onboarding.lock().await;
    wizard.retreat();
    Ok(wizard.snapshot())
}
