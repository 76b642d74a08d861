pub mod assistant;
pub mod commands;
pub mod config;
pub mod db;
pub mod documents;
pub mod email;
pub mod identity;
pub mod models;
pub mod onboarding;
pub mod registration;
pub mod routes;
pub mod store;
mod utils;

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex as StdMutex},
};

use anyhow::{Context, Result};
use tokio::sync::{watch, Mutex};

use assistant::{ChatSession, Persona};
use config::ConfigStore;
use db::Database;
use documents::DocumentStore;
use email::{EmailJsClient, EmailSender};
use identity::{GateSubscription, IdentityGate, IdentityProvider, MemoryIdentityProvider};
use onboarding::OnboardingWizard;
use registration::{RegistrationFlow, RegistrationSnapshot};
use routes::{Route, Router};
use store::Store;

const SETTINGS_FILE: &str = "settings.json";
const DATABASE_FILE: &str = "curexo.sqlite3";
const DEFAULT_DATA_DIR: &str = "curexo-data";

/// Root of the application. Every command handler receives it by reference.
pub struct AppState {
    pub config: ConfigStore,
    pub store: Store,
    pub router: Router,
    pub gate: IdentityGate,
    pub registration: Mutex<RegistrationFlow>,
    registration_status: watch::Receiver<RegistrationSnapshot>,
    pub onboarding: Mutex<OnboardingWizard>,
    pub assistant_chat: Mutex<ChatSession>,
    pub chatbot_chat: Mutex<ChatSession>,
    subscription: StdMutex<Option<GateSubscription>>,
}

impl AppState {
    pub fn new(
        config: ConfigStore,
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        let store = Store::new();
        let router = Router::new(Route::Root);
        let gate = IdentityGate::new(
            identity.clone(),
            documents.clone(),
            store.clone(),
            router.clone(),
        );
        let registration =
            RegistrationFlow::new(identity, documents, email, config.email(), router.clone());
        let registration_status = registration.watch();
        let onboarding = OnboardingWizard::new(gate.clone(), router.clone());
        let latency = config.get().chat_latency;

        Self {
            config,
            store,
            router,
            gate,
            registration: Mutex::new(registration),
            registration_status,
            onboarding: Mutex::new(onboarding),
            assistant_chat: Mutex::new(ChatSession::new(
                Persona::Assistant,
                latency.assistant(),
                None,
            )),
            chatbot_chat: Mutex::new(ChatSession::new(Persona::Chatbot, latency.chatbot(), None)),
            subscription: StdMutex::new(None),
        }
    }

    /// Starts following the identity provider's session. Calling it again
    /// replaces the previous subscription. Must run inside a tokio runtime.
    pub fn start(&self) {
        let subscription = self.gate.subscribe();
        let mut slot = match self.subscription.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(subscription);
    }

    /// Stops the session listener and waits for it to finish.
    pub async fn shutdown(&self) {
        let subscription = match self.subscription.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(subscription) = subscription {
            subscription.unsubscribe().await;
        }
        log::info!("CUREXO shut down");
    }
}

/// Directory for the database and settings: `CUREXO_DATA_DIR` if set,
/// otherwise `./curexo-data`.
pub fn default_data_dir() -> PathBuf {
    config::AppConfig::from_env()
        .data_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Wires the shipped collaborators: SQLite documents, EmailJS delivery and
/// the in-process identity provider.
pub fn bootstrap(data_dir: &Path) -> Result<AppState> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let config = ConfigStore::new(data_dir.join(SETTINGS_FILE))?;
    let database = Database::new(data_dir.join(DATABASE_FILE))?;
    let email = EmailJsClient::new(&config.email());

    if config.email().service_id.is_empty() {
        log::warn!("EmailJS credentials are not configured; verification emails will fail");
    }

    Ok(AppState::new(
        config,
        Arc::new(MemoryIdentityProvider::new()),
        Arc::new(database),
        Arc::new(email),
    ))
}

/// Logging setup. `RUST_LOG` overrides the default Info level.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
    log::info!("CUREXO starting up...");
}
