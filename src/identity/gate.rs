use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use super::provider::{AuthError, IdentityProvider};
use crate::{
    documents::{DocumentStore, ProfileDocument, SetOptions, USERS_COLLECTION},
    models::Identity,
    routes::{Route, Router, SessionView},
    store::Store,
};

// Set to false to silence session bookkeeping logs.
const ENABLE_LOGS: bool = true;

/// Upper bound on how long a sign-in waits for the session listener.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

use crate::{log_error, log_info, log_warn};

/// Session facts the gate derives on top of the raw identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateState {
    pub user: Option<Identity>,
    pub is_loading: bool,
    pub is_new_user: bool,
    pub has_completed_onboarding: bool,
}

impl Default for GateState {
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
            is_new_user: false,
            has_completed_onboarding: false,
        }
    }
}

impl GateState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn session_view(&self) -> SessionView {
        SessionView {
            is_authenticated: self.is_authenticated(),
            is_loading: self.is_loading,
            is_new_user: self.is_new_user,
            has_completed_onboarding: self.has_completed_onboarding,
        }
    }
}

/// Bridges the identity provider's session stream into the store and keeps
/// the onboarding status of the signed-in identity.
#[derive(Clone)]
pub struct IdentityGate {
    provider: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
    store: Store,
    router: Router,
    state: Arc<watch::Sender<GateState>>,
    listeners: Arc<AtomicUsize>,
}

impl IdentityGate {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        store: Store,
        router: Router,
    ) -> Self {
        let (state, _rx) = watch::channel(GateState::default());
        Self {
            provider,
            documents,
            store,
            router,
            state: Arc::new(state),
            listeners: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state(&self) -> GateState {
        self.state.borrow().clone()
    }

    pub fn session_view(&self) -> SessionView {
        self.state.borrow().session_view()
    }

    pub fn watch(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }

    pub fn provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.provider
    }

    pub fn documents(&self) -> &Arc<dyn DocumentStore> {
        &self.documents
    }

    /// Follows the provider's session stream until the returned handle is
    /// dropped or unsubscribed. The current session is processed first.
    pub fn subscribe(&self) -> GateSubscription {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let gate = self.clone();
        let mut session_rx = self.provider.session();
        self.listeners.fetch_add(1, Ordering::SeqCst);

        let handle = tokio::spawn(async move {
            let initial = session_rx.borrow_and_update().clone();
            gate.handle_session_change(initial).await;

            loop {
                tokio::select! {
                    changed = session_rx.changed() => {
                        if changed.is_err() {
                            log_warn!("identity provider closed its session stream");
                            break;
                        }
                        let next = session_rx.borrow_and_update().clone();
                        gate.handle_session_change(next).await;
                    }
                    _ = token.cancelled() => {
                        log_info!("session subscription cancelled");
                        break;
                    }
                }
            }
            gate.listeners.fetch_sub(1, Ordering::SeqCst);
        });

        GateSubscription {
            cancel_token,
            handle: Some(handle),
        }
    }

    /// Applies one session change: mirrors the identity into the store, then
    /// resolves onboarding status from the profile document.
    pub async fn handle_session_change(&self, identity: Option<Identity>) {
        self.store.set_user(identity.clone());

        let Some(identity) = identity else {
            self.state.send_replace(GateState {
                is_loading: false,
                ..GateState::default()
            });
            return;
        };

        match self.resolve_profile(&identity).await {
            Ok((is_new_user, has_completed_onboarding)) => {
                self.state.send_replace(GateState {
                    user: Some(identity),
                    is_loading: false,
                    is_new_user,
                    has_completed_onboarding,
                });
            }
            Err(err) => {
                log_error!("failed to resolve profile for {}: {err:#}", identity.uid);
                self.state.send_replace(GateState {
                    user: Some(identity),
                    is_loading: false,
                    is_new_user: false,
                    has_completed_onboarding: false,
                });
            }
        }
    }

    /// Returns `(is_new_user, has_completed_onboarding)`. An identity without a
    /// profile document gets a minimal one.
    async fn resolve_profile(&self, identity: &Identity) -> Result<(bool, bool)> {
        let existing = self
            .documents
            .get_document(USERS_COLLECTION, &identity.uid)
            .await
            .context("failed to read profile document")?;

        match existing {
            Some(document) => {
                let profile = ProfileDocument::from_value(document)
                    .context("profile document is malformed")?;
                Ok((false, profile.has_completed_onboarding))
            }
            None => {
                log_info!("no profile for {}; creating one", identity.uid);
                let profile = ProfileDocument {
                    email: identity.email.clone(),
                    display_name: identity.display_name.clone(),
                    created_at: Utc::now().to_rfc3339(),
                    has_completed_onboarding: false,
                    ..Default::default()
                };
                // Merged so a registration write racing this one keeps its
                // name and phone.
                self.documents
                    .set_document(
                        USERS_COLLECTION,
                        &identity.uid,
                        profile.to_value(),
                        SetOptions::merge(),
                    )
                    .await
                    .context("failed to create profile document")?;
                Ok((true, false))
            }
        }
    }

    /// Ends the provider session and returns to the login page. A provider
    /// failure is logged and leaves the session as it was.
    pub async fn logout(&self) {
        match self.provider.sign_out().await {
            Ok(()) => self.router.push(Route::Login),
            Err(err) => log_error!("Error signing out: {err}"),
        }
    }

    /// Signs in, waits for the session to settle, then heads for the
    /// dashboard through its guard. A fresh identity lands on onboarding.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = self.provider.sign_in(email, password).await?;
        let session = self.settle(&identity).await;
        let landed = self.router.visit(Route::Dashboard, &session);
        log_info!("signed in {}; landed on {}", identity.uid, landed.path());
        Ok(identity)
    }

    /// Session view once `identity` has been resolved. Without a running
    /// listener the change is applied here instead.
    async fn settle(&self, identity: &Identity) -> SessionView {
        if self.listeners.load(Ordering::SeqCst) == 0 {
            self.handle_session_change(Some(identity.clone())).await;
            return self.session_view();
        }

        let uid = identity.uid.as_str();
        let mut rx = self.state.subscribe();
        let settled = rx.wait_for(|state| {
            !state.is_loading && state.user.as_ref().is_some_and(|user| user.uid == uid)
        });
        let view = match tokio::time::timeout(SETTLE_TIMEOUT, settled).await {
            Ok(Ok(state)) => Some(state.session_view()),
            Ok(Err(_)) | Err(_) => None,
        };
        view.unwrap_or_else(|| {
            log_warn!("session for {uid} did not settle; using current state");
            self.session_view()
        })
    }

    /// Write-through of the onboarding flag: only that field of the profile
    /// document is touched. Without a signed-in identity this does nothing.
    pub async fn set_has_completed_onboarding(&self, value: bool) -> Result<()> {
        let Some(user) = self.state.borrow().user.clone() else {
            return Ok(());
        };

        self.documents
            .set_document(
                USERS_COLLECTION,
                &user.uid,
                json!({ "hasCompletedOnboarding": value }),
                SetOptions::merge(),
            )
            .await
            .context("failed to update onboarding flag")?;

        self.state.send_modify(|state| {
            state.has_completed_onboarding = value;
        });
        Ok(())
    }
}

/// Live session subscription. Dropping it stops the listener.
pub struct GateSubscription {
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl GateSubscription {
    pub async fn unsubscribe(mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                log_error!("session listener failed to join: {err}");
            }
        }
    }
}

impl Drop for GateSubscription {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
