//! First-run wizard: personal details, body metrics, medical notes.

pub mod commands;
mod steps;

pub use steps::{FieldKind, FieldSpec, OnboardingField, StepSpec, STEPS};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    identity::IdentityGate,
    routes::{guard, Route, Router, SessionView},
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    #[error("Please fill in all required fields")]
    MissingRequired(Vec<OnboardingField>),
    #[error("Failed to save your progress. Please try again.")]
    Persist,
}

/// Values entered so far, one string per field as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OnboardingProfile {
    pub full_name: String,
    pub date_of_birth: String,
    pub height: String,
    pub weight: String,
    pub blood_type: String,
    pub allergies: String,
    pub chronic_conditions: String,
}

impl OnboardingProfile {
    pub fn get(&self, field: OnboardingField) -> &str {
        match field {
            OnboardingField::FullName => &self.full_name,
            OnboardingField::DateOfBirth => &self.date_of_birth,
            OnboardingField::Height => &self.height,
            OnboardingField::Weight => &self.weight,
            OnboardingField::BloodType => &self.blood_type,
            OnboardingField::Allergies => &self.allergies,
            OnboardingField::ChronicConditions => &self.chronic_conditions,
        }
    }

    pub fn set(&mut self, field: OnboardingField, value: String) {
        let slot = match field {
            OnboardingField::FullName => &mut self.full_name,
            OnboardingField::DateOfBirth => &mut self.date_of_birth,
            OnboardingField::Height => &mut self.height,
            OnboardingField::Weight => &mut self.weight,
            OnboardingField::BloodType => &mut self.blood_type,
            OnboardingField::Allergies => &mut self.allergies,
            OnboardingField::ChronicConditions => &mut self.chronic_conditions,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "step")]
pub enum Advance {
    /// Moved to the step with this index.
    Next(usize),
    Completed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSnapshot {
    pub current_step: usize,
    pub step_count: usize,
    pub step: &'static StepSpec,
    pub profile: OnboardingProfile,
    pub validation: Option<String>,
}

pub struct OnboardingWizard {
    gate: IdentityGate,
    router: Router,
    current: usize,
    profile: OnboardingProfile,
    validation: Option<String>,
}

impl OnboardingWizard {
    pub fn new(gate: IdentityGate, router: Router) -> Self {
        Self {
            gate,
            router,
            current: 0,
            profile: OnboardingProfile::default(),
            validation: None,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn step(&self) -> &'static StepSpec {
        &STEPS[self.current]
    }

    pub fn profile(&self) -> &OnboardingProfile {
        &self.profile
    }

    pub fn validation(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    pub fn snapshot(&self) -> OnboardingSnapshot {
        OnboardingSnapshot {
            current_step: self.current,
            step_count: STEPS.len(),
            step: self.step(),
            profile: self.profile.clone(),
            validation: self.validation.clone(),
        }
    }

    pub fn set_field(&mut self, field: OnboardingField, value: impl Into<String>) {
        self.profile.set(field, value.into());
    }

    /// Swaps in an edited profile. Used by the profile page after onboarding.
    pub fn set_profile(&mut self, profile: OnboardingProfile) {
        self.profile = profile;
    }

    /// Required fields of the current step that are empty or whitespace.
    pub fn missing_required(&self) -> Vec<OnboardingField> {
        self.step()
            .fields
            .iter()
            .filter(|spec| spec.required && self.profile.get(spec.field).trim().is_empty())
            .map(|spec| spec.field)
            .collect()
    }

    /// Validates the current step, then moves forward or, on the last step,
    /// marks onboarding complete and heads to the dashboard.
    pub async fn advance(&mut self) -> Result<Advance, OnboardingError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            let err = OnboardingError::MissingRequired(missing);
            self.validation = Some(err.to_string());
            return Err(err);
        }
        self.validation = None;

        if self.current + 1 < STEPS.len() {
            self.current += 1;
            return Ok(Advance::Next(self.current));
        }

        if let Err(err) = self.gate.set_has_completed_onboarding(true).await {
            log_error!("failed to complete onboarding: {err:#}");
            self.validation = Some(OnboardingError::Persist.to_string());
            return Err(OnboardingError::Persist);
        }

        log_info!("onboarding completed");
        self.router.push(Route::Dashboard);
        Ok(Advance::Completed)
    }

    /// Steps back one page. Never validated.
    pub fn retreat(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
        self.validation = None;
    }

    /// Redirect for a visitor of the onboarding page, if any.
    pub fn entry_guard(session: &SessionView) -> Option<Route> {
        guard(Route::Onboarding, session)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        db::Database,
        documents::USERS_COLLECTION,
        identity::{IdentityProvider, MemoryIdentityProvider},
        store::Store,
    };

    struct Harness {
        wizard: OnboardingWizard,
        gate: IdentityGate,
        documents: Arc<Database>,
        router: Router,
        uid: String,
    }

    async fn signed_in() -> Harness {
        let provider = Arc::new(MemoryIdentityProvider::new());
        let documents = Arc::new(Database::open_in_memory().unwrap());
        let router = Router::new(Route::Onboarding);
        let gate = IdentityGate::new(
            provider.clone(),
            documents.clone(),
            Store::new(),
            router.clone(),
        );

        let identity = provider
            .create_account("pat@example.com", "secret1")
            .await
            .unwrap();
        let uid = identity.uid.clone();
        gate.handle_session_change(Some(identity)).await;

        Harness {
            wizard: OnboardingWizard::new(gate.clone(), router.clone()),
            gate,
            documents,
            router,
            uid,
        }
    }

    #[tokio::test]
    async fn empty_required_fields_block_advance() {
        let mut h = signed_in().await;
        h.wizard.set_field(OnboardingField::FullName, "   ");

        let err = h.wizard.advance().await.unwrap_err();
        assert_eq!(
            err,
            OnboardingError::MissingRequired(vec![
                OnboardingField::FullName,
                OnboardingField::DateOfBirth
            ])
        );
        assert_eq!(h.wizard.current_step(), 0);
        assert_eq!(
            h.wizard.validation(),
            Some("Please fill in all required fields")
        );
    }

    #[tokio::test]
    async fn optional_fields_may_stay_empty() {
        let mut h = signed_in().await;
        h.wizard.set_field(OnboardingField::FullName, "Pat Doe");
        h.wizard.set_field(OnboardingField::DateOfBirth, "1990-04-01");
        assert_eq!(h.wizard.advance().await, Ok(Advance::Next(1)));

        h.wizard.set_field(OnboardingField::Height, "170");
        h.wizard.set_field(OnboardingField::Weight, "65");
        assert_eq!(h.wizard.advance().await, Ok(Advance::Next(2)));
        assert!(h.wizard.missing_required().is_empty());
    }

    #[tokio::test]
    async fn last_step_completes_onboarding() {
        let mut h = signed_in().await;
        assert!(h.gate.state().is_new_user);

        h.wizard.set_field(OnboardingField::FullName, "Pat Doe");
        h.wizard.set_field(OnboardingField::DateOfBirth, "1990-04-01");
        h.wizard.advance().await.unwrap();
        h.wizard.set_field(OnboardingField::Height, "170");
        h.wizard.set_field(OnboardingField::Weight, "65");
        h.wizard.advance().await.unwrap();

        assert_eq!(h.wizard.advance().await, Ok(Advance::Completed));
        assert!(h.gate.state().has_completed_onboarding);
        assert_eq!(h.router.current(), Route::Dashboard);

        let profile = h
            .documents
            .get_document(USERS_COLLECTION, &h.uid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile["hasCompletedOnboarding"], true);
        assert_eq!(profile["email"], "pat@example.com");
    }

    #[tokio::test]
    async fn retreat_keeps_values_and_stops_at_first_step() {
        let mut h = signed_in().await;
        h.wizard.retreat();
        assert_eq!(h.wizard.current_step(), 0);

        h.wizard.set_field(OnboardingField::FullName, "Pat Doe");
        h.wizard.set_field(OnboardingField::DateOfBirth, "1990-04-01");
        h.wizard.advance().await.unwrap();
        h.wizard.retreat();

        assert_eq!(h.wizard.current_step(), 0);
        assert_eq!(h.wizard.profile().full_name, "Pat Doe");
    }

    #[test]
    fn entry_guard_follows_onboarding_status() {
        let returning = SessionView {
            is_authenticated: true,
            has_completed_onboarding: true,
            ..Default::default()
        };
        assert_eq!(
            OnboardingWizard::entry_guard(&returning),
            Some(Route::Dashboard)
        );

        let fresh = SessionView {
            is_authenticated: true,
            is_new_user: true,
            ..Default::default()
        };
        assert_eq!(OnboardingWizard::entry_guard(&fresh), None);
        assert_eq!(
            OnboardingWizard::entry_guard(&SessionView::default()),
            Some(Route::Login)
        );
    }
}
