use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::models::Identity;

/// Failure codes an identity provider reports. Callers map them to
/// user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("email already in use")]
    EmailAlreadyInUse,
    #[error("user not found")]
    UserNotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error("too many requests")]
    TooManyRequests,
    #[error("password is too weak")]
    WeakPassword,
    #[error("no signed-in user")]
    NotSignedIn,
    #[error("identity provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates the account and signs it in.
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Sets the display name of the signed-in account.
    async fn update_profile(&self, display_name: &str) -> Result<Identity, AuthError>;

    /// Session stream. The receiver starts at the current session, so the first
    /// `borrow` reports the state at subscription time.
    fn session(&self) -> watch::Receiver<Option<Identity>>;
}
