use serde::Serialize;

use crate::{
    identity::{login_error_message, GateState},
    models::Identity,
    routes::Route,
    AppState,
};

const ENABLE_LOGS: bool = true;

use crate::log_error;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(flatten)]
    pub gate: GateState,
    pub route: Route,
}

pub async fn login(state: &AppState, email: String, password: String) -> Result<Identity, String> {
    state.gate.sign_in(&email, &password).await.map_err(|err| {
        log_error!("Login error: {err}");
        login_error_message(&err).to_string()
    })
}

pub async fn logout(state: &AppState) -> Result<(), String> {
    state.gate.logout().await;
    Ok(())
}

pub async fn get_session(state: &AppState) -> Result<SessionInfo, String> {
    Ok(SessionInfo {
        gate: state.gate.state(),
        route: state.router.current(),
    })
}
