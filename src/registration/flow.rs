use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::{
    config::EmailConfig,
    documents::{DocumentStore, ProfileDocument, SetOptions, USERS_COLLECTION},
    email::{generate_otp, EmailSender, OtpTemplateParams},
    identity::{AuthError, IdentityProvider},
    models::Identity,
    routes::{Route, Router},
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationStep {
    CollectingProfile,
    AwaitingCode,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Checks run in order; the first failure is the one reported.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let fields = [
            &self.name,
            &self.email,
            &self.phone,
            &self.password,
            &self.confirm_password,
        ];
        if fields.iter().any(|value| value.is_empty()) {
            return Err(RegistrationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationError::PasswordTooShort);
        }
        Ok(())
    }
}

/// Every failure the sign-up screen can show. The display text is the message
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Failed to send verification email. Please try again.")]
    EmailDelivery,
    #[error("Invalid OTP. Please try again.")]
    InvalidCode,
    #[error("Registration is not waiting for a verification code")]
    NotAwaitingCode,
    #[error("This email is already registered. Please use a different email or login.")]
    EmailAlreadyRegistered,
    #[error("Failed to register. Please try again.")]
    Failed,
}

impl From<AuthError> for RegistrationError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyInUse => RegistrationError::EmailAlreadyRegistered,
            _ => RegistrationError::Failed,
        }
    }
}

/// Public view of the flow for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSnapshot {
    pub step: RegistrationStep,
    pub error: Option<String>,
    pub is_submitting: bool,
    pub email: String,
}

/// Sign-up with email verification.
///
/// `CollectingProfile` --submit_profile--> `AwaitingCode` --verify_code--> `Completed`.
/// The generated code is kept only in this value; it never expires and there
/// is no attempt limit.
pub struct RegistrationFlow {
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
    email: Arc<dyn EmailSender>,
    email_config: EmailConfig,
    router: Router,
    form: RegistrationForm,
    step: RegistrationStep,
    generated_code: Option<String>,
    error: Option<String>,
    is_submitting: bool,
    status: watch::Sender<RegistrationSnapshot>,
}

impl RegistrationFlow {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        email: Arc<dyn EmailSender>,
        email_config: EmailConfig,
        router: Router,
    ) -> Self {
        let (status, _rx) = watch::channel(RegistrationSnapshot {
            step: RegistrationStep::CollectingProfile,
            error: None,
            is_submitting: false,
            email: String::new(),
        });
        Self {
            identity,
            documents,
            email,
            email_config,
            router,
            form: RegistrationForm::default(),
            step: RegistrationStep::CollectingProfile,
            generated_code: None,
            error: None,
            is_submitting: false,
            status,
        }
    }

    /// Every change to the flow is published here, including the
    /// `is_submitting` window around each collaborator call.
    pub fn watch(&self) -> watch::Receiver<RegistrationSnapshot> {
        self.status.subscribe()
    }

    fn publish(&self) {
        self.status.send_replace(self.snapshot());
    }

    fn set_submitting(&mut self, submitting: bool) {
        self.is_submitting = submitting;
        self.publish();
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn snapshot(&self) -> RegistrationSnapshot {
        RegistrationSnapshot {
            step: self.step,
            error: self.error.clone(),
            is_submitting: self.is_submitting,
            email: self.form.email.clone(),
        }
    }

    /// Form edits are only accepted while the profile is being collected.
    pub fn set_form(&mut self, form: RegistrationForm) {
        if self.step == RegistrationStep::CollectingProfile {
            self.form = form;
            self.publish();
        }
    }

    /// Throws away everything and starts over with an empty form.
    pub fn reset(&mut self) {
        self.form = RegistrationForm::default();
        self.step = RegistrationStep::CollectingProfile;
        self.generated_code = None;
        self.error = None;
        self.is_submitting = false;
        self.publish();
    }

    fn fail(&mut self, err: RegistrationError) -> RegistrationError {
        self.error = Some(err.to_string());
        self.publish();
        err
    }

    pub async fn submit_profile(&mut self) -> Result<RegistrationStep, RegistrationError> {
        self.error = None;
        if self.step != RegistrationStep::CollectingProfile {
            self.publish();
            return Ok(self.step);
        }

        if let Err(err) = self.form.validate() {
            return Err(self.fail(err));
        }

        self.set_submitting(true);
        let sent = self.send_code().await;
        self.is_submitting = false;

        match sent {
            Ok(()) => {
                self.step = RegistrationStep::AwaitingCode;
                self.publish();
                Ok(self.step)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Generates and sends a fresh code without re-validating the form.
    pub async fn resend_code(&mut self) -> Result<(), RegistrationError> {
        self.error = None;
        if self.step != RegistrationStep::AwaitingCode {
            return Err(self.fail(RegistrationError::NotAwaitingCode));
        }

        self.set_submitting(true);
        let sent = self.send_code().await;
        self.is_submitting = false;

        match sent {
            Ok(()) => {
                self.publish();
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn send_code(&mut self) -> Result<(), RegistrationError> {
        let code = generate_otp();
        self.generated_code = Some(code.clone());

        let params = OtpTemplateParams {
            to_email: self.form.email.clone(),
            otp: code,
        };
        let receipt = self
            .email
            .send(
                &self.email_config.service_id,
                &self.email_config.template_id,
                &params,
            )
            .await;

        if receipt.success {
            log_info!("verification code sent to {}", params.to_email);
            Ok(())
        } else {
            Err(RegistrationError::EmailDelivery)
        }
    }

    /// On a textual match: creates the account, names it, writes the full
    /// profile document and moves to onboarding.
    pub async fn verify_code(&mut self, entered: &str) -> Result<Identity, RegistrationError> {
        self.error = None;
        if self.step != RegistrationStep::AwaitingCode {
            return Err(self.fail(RegistrationError::NotAwaitingCode));
        }

        if self.generated_code.as_deref() != Some(entered) {
            return Err(self.fail(RegistrationError::InvalidCode));
        }

        self.set_submitting(true);
        let created = self.create_account().await;
        self.is_submitting = false;

        match created {
            Ok(identity) => {
                self.step = RegistrationStep::Completed;
                self.generated_code = None;
                self.publish();
                self.router.push(Route::Onboarding);
                Ok(identity)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn create_account(&self) -> Result<Identity, RegistrationError> {
        let form = &self.form;

        let identity = self
            .identity
            .create_account(&form.email, &form.password)
            .await
            .map_err(|err| {
                log_error!("Registration error: {err}");
                RegistrationError::from(err)
            })?;

        let identity = self
            .identity
            .update_profile(&form.name)
            .await
            .map_err(|err| {
                log_error!("Registration error: {err}");
                RegistrationError::from(err)
            })?;

        let profile = ProfileDocument {
            name: Some(form.name.clone()),
            email: Some(form.email.clone()),
            phone: Some(form.phone.clone()),
            created_at: Utc::now().to_rfc3339(),
            has_completed_onboarding: false,
            ..Default::default()
        };
        self.documents
            .set_document(
                USERS_COLLECTION,
                &identity.uid,
                profile.to_value(),
                SetOptions::default(),
            )
            .await
            .map_err(|err| {
                log_error!("Registration error: failed to write profile: {err:#}");
                RegistrationError::Failed
            })?;

        Ok(identity)
    }
}
