use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};

use super::provider::{AuthError, IdentityProvider};
use crate::models::{new_id, Identity};

const MIN_PASSWORD_LEN: usize = 6;
const MAX_FAILED_SIGN_INS: u32 = 5;

struct Account {
    uid: String,
    password: String,
    display_name: Option<String>,
    failed_sign_ins: u32,
}

impl Account {
    fn identity(&self, email: &str) -> Identity {
        Identity {
            uid: self.uid.clone(),
            email: Some(email.to_string()),
            display_name: self.display_name.clone(),
        }
    }
}

/// Process-local identity provider. Accounts live only as long as the value;
/// the session stream behaves like a hosted provider's.
pub struct MemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    session: watch::Sender<Option<Identity>>,
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        let (session, _rx) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            session,
        }
    }

    pub fn current(&self) -> Option<Identity> {
        self.session.borrow().clone()
    }

    fn normalize(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let key = Self::normalize(email);
        let identity = {
            let mut accounts = self.accounts.lock().await;
            if accounts.contains_key(&key) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            let account = Account {
                uid: new_id(),
                password: password.to_string(),
                display_name: None,
                failed_sign_ins: 0,
            };
            let identity = account.identity(&key);
            accounts.insert(key, account);
            identity
        };

        self.session.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let key = Self::normalize(email);
        let identity = {
            let mut accounts = self.accounts.lock().await;
            let account = accounts.get_mut(&key).ok_or(AuthError::UserNotFound)?;
            if account.failed_sign_ins >= MAX_FAILED_SIGN_INS {
                return Err(AuthError::TooManyRequests);
            }
            if account.password != password {
                account.failed_sign_ins += 1;
                return Err(AuthError::WrongPassword);
            }
            account.failed_sign_ins = 0;
            account.identity(&key)
        };

        self.session.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.session.send_replace(None);
        Ok(())
    }

    async fn update_profile(&self, display_name: &str) -> Result<Identity, AuthError> {
        let current = self.current().ok_or(AuthError::NotSignedIn)?;
        let key = current.email.clone().unwrap_or_default();

        let identity = {
            let mut accounts = self.accounts.lock().await;
            let account = accounts.get_mut(&key).ok_or(AuthError::UserNotFound)?;
            account.display_name = Some(display_name.to_string());
            account.identity(&key)
        };

        // Profile edits do not emit a session change, matching hosted providers.
        self.session.send_if_modified(|session| {
            *session = Some(identity.clone());
            false
        });
        Ok(identity)
    }

    fn session(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_account_signs_in() {
        let provider = MemoryIdentityProvider::new();
        let rx = provider.session();
        let identity = provider.create_account("Jane@Example.com", "secret1").await.unwrap();

        assert_eq!(identity.email.as_deref(), Some("jane@example.com"));
        assert_eq!(rx.borrow().as_ref(), Some(&identity));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let provider = MemoryIdentityProvider::new();
        provider.create_account("jane@example.com", "secret1").await.unwrap();
        let err = provider
            .create_account("jane@example.com", "secret2")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailAlreadyInUse);
    }

    #[tokio::test]
    async fn repeated_wrong_passwords_lock_the_account() {
        let provider = MemoryIdentityProvider::new();
        provider.create_account("jane@example.com", "secret1").await.unwrap();
        provider.sign_out().await.unwrap();

        for _ in 0..MAX_FAILED_SIGN_INS {
            assert_eq!(
                provider.sign_in("jane@example.com", "nope").await.unwrap_err(),
                AuthError::WrongPassword
            );
        }
        assert_eq!(
            provider.sign_in("jane@example.com", "secret1").await.unwrap_err(),
            AuthError::TooManyRequests
        );
        assert_eq!(
            provider.sign_in("ghost@example.com", "secret1").await.unwrap_err(),
            AuthError::UserNotFound
        );
    }

    #[tokio::test]
    async fn update_profile_requires_session() {
        let provider = MemoryIdentityProvider::new();
        assert_eq!(
            provider.update_profile("Jane").await.unwrap_err(),
            AuthError::NotSignedIn
        );

        provider.create_account("jane@example.com", "secret1").await.unwrap();
        let updated = provider.update_profile("Jane").await.unwrap();
        assert_eq!(updated.display_name.as_deref(), Some("Jane"));
        assert_eq!(provider.current().unwrap().display_name.as_deref(), Some("Jane"));
    }
}
