use serde::Serialize;

use super::require_session;
use crate::{
    documents::{ProfileDocument, USERS_COLLECTION},
    models::Identity,
    onboarding::OnboardingProfile,
    AppState,
};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// What the profile page shows: who is signed in plus the health details
/// entered during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub uid: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub details: OnboardingProfile,
}

async fn stored_profile(state: &AppState, uid: &str) -> Option<ProfileDocument> {
    let document = match state
        .gate
        .documents()
        .get_document(USERS_COLLECTION, uid)
        .await
    {
        Ok(document) => document?,
        Err(err) => {
            log_warn!("failed to read profile for {uid}: {err:#}");
            return None;
        }
    };
    match ProfileDocument::from_value(document) {
        Ok(profile) => Some(profile),
        Err(err) => {
            log_warn!("profile for {uid} is malformed: {err:#}");
            None
        }
    }
}

async fn build_view(state: &AppState, identity: Identity) -> ProfileView {
    let details = state.onboarding.lock().await.profile().clone();
    let stored = stored_profile(state, &identity.uid).await.unwrap_or_default();

    // The name typed during onboarding wins over the one given at sign-up.
    let name = Some(details.full_name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or(stored.name)
        .or(identity.display_name)
        .unwrap_or_default();

    ProfileView {
        uid: identity.uid,
        name,
        email: identity.email.or(stored.email),
        phone: stored.phone,
        details,
    }
}

pub async fn get_profile(state: &AppState) -> Result<ProfileView, String> {
    let identity = require_session(state)?;
    Ok(build_view(state, identity).await)
}

/// Replaces the health details for the rest of the session.
pub async fn update_profile(
    state: &AppState,
    details: OnboardingProfile,
) -> Result<ProfileView, String> {
    let identity = require_session(state)?;
    state.onboarding.lock().await.set_profile(details);
    Ok(build_view(state, identity).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        commands::{tests::signed_in_state, NOT_SIGNED_IN},
        onboarding::OnboardingField,
    };

    #[tokio::test]
    async fn profile_combines_identity_and_onboarding_details() {
        let state = signed_in_state().await;
        {
            let mut wizard = state.onboarding.lock().await;
            wizard.set_field(OnboardingField::FullName, "Pat Doe");
            wizard.set_field(OnboardingField::BloodType, "O+");
        }

        let view = get_profile(&state).await.unwrap();
        assert_eq!(view.name, "Pat Doe");
        assert_eq!(view.email.as_deref(), Some("pat@example.com"));
        assert_eq!(view.details.blood_type, "O+");
        assert_eq!(view.phone, None);
    }

    #[tokio::test]
    async fn edits_replace_details_for_the_session() {
        let state = signed_in_state().await;
        let edited = OnboardingProfile {
            full_name: "Pat Q. Doe".into(),
            height: "181".into(),
            weight: "80".into(),
            allergies: "Penicillin".into(),
            ..Default::default()
        };

        let view = update_profile(&state, edited.clone()).await.unwrap();
        assert_eq!(view.name, "Pat Q. Doe");
        assert_eq!(view.details, edited);
        assert_eq!(state.onboarding.lock().await.profile(), &edited);
    }

    #[tokio::test]
    async fn profile_requires_a_session() {
        let state = signed_in_state().await;
        state.gate.handle_session_change(None).await;

        assert_eq!(get_profile(&state).await.unwrap_err(), NOT_SIGNED_IN);
        assert_eq!(
            update_profile(&state, OnboardingProfile::default())
                .await
                .unwrap_err(),
            NOT_SIGNED_IN
        );
    }
}
