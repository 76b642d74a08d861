use chrono::Local;
use serde::Serialize;
use serde_json::Value;

use super::{create, list, modify, remove};
use crate::{
    models::{Medicine, MedicinePatch},
    AppState,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinetEntry {
    #[serde(flatten)]
    pub medicine: Medicine,
    pub is_expired: bool,
}

pub async fn get_medicines(state: &AppState) -> Result<Vec<Medicine>, String> {
    list(state)
}

/// The medicine cabinet: every medicine with its expiry status for today.
pub async fn get_cabinet(state: &AppState) -> Result<Vec<CabinetEntry>, String> {
    let today = Local::now().date_naive();
    let medicines: Vec<Medicine> = list(state)?;
    Ok(medicines
        .into_iter()
        .map(|medicine| CabinetEntry {
            is_expired: medicine.is_expired_on(today),
            medicine,
        })
        .collect())
}

pub async fn add_medicine(state: &AppState, draft: Value) -> Result<Medicine, String> {
    create(state, draft)
}

pub async fn update_medicine(
    state: &AppState,
    id: String,
    patch: MedicinePatch,
) -> Result<Option<Medicine>, String> {
    modify::<Medicine>(state, &id, patch)
}

pub async fn delete_medicine(state: &AppState, id: String) -> Result<(), String> {
    remove::<Medicine>(state, &id)
}
