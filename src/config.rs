use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::Duration,
};

pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

const ENV_SERVICE_ID: &str = "EMAILJS_SERVICE_ID";
const ENV_TEMPLATE_ID: &str = "EMAILJS_TEMPLATE_ID";
const ENV_USER_ID: &str = "EMAILJS_USER_ID";
const ENV_DATA_DIR: &str = "CUREXO_DATA_DIR";
const ENV_DEBUG: &str = "CUREXO_DEBUG";

/// The three pre-shared EmailJS values. Unset values stay empty; sends then
/// fail at the provider instead of at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailConfig {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub endpoint: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            user_id: String::new(),
            endpoint: EMAILJS_ENDPOINT.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatLatency {
    pub assistant_ms: u64,
    pub chatbot_ms: u64,
}

impl Default for ChatLatency {
    fn default() -> Self {
        Self {
            assistant_ms: 1500,
            chatbot_ms: 1000,
        }
    }
}

impl ChatLatency {
    pub fn none() -> Self {
        Self {
            assistant_ms: 0,
            chatbot_ms: 0,
        }
    }

    pub fn assistant(&self) -> Duration {
        Duration::from_millis(self.assistant_ms)
    }

    pub fn chatbot(&self) -> Duration {
        Duration::from_millis(self.chatbot_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub email: EmailConfig,
    pub chat_latency: ChatLatency,
    #[serde(skip)]
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Environment values win over whatever the settings file holds.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_SERVICE_ID) {
            self.email.service_id = value;
        }
        if let Some(value) = lookup(ENV_TEMPLATE_ID) {
            self.email.template_id = value;
        }
        if let Some(value) = lookup(ENV_USER_ID) {
            self.email.user_id = value;
        }
        if let Some(value) = lookup(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(value));
        }

        let debug_mode = lookup(ENV_DEBUG)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if debug_mode {
            self.chat_latency = ChatLatency::none();
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }
}

/// Config loaded from `settings.json` and overlaid with the environment.
pub struct ConfigStore {
    path: PathBuf,
    data: RwLock<AppConfig>,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut data: AppConfig = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            AppConfig::default()
        };
        data.apply_env(|key| std::env::var(key).ok());

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// A store that is never written to disk.
    pub fn detached(config: AppConfig) -> Self {
        Self {
            path: PathBuf::new(),
            data: RwLock::new(config),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> AppConfig {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn email(&self) -> EmailConfig {
        self.get().email
    }

    pub fn update_chat_latency(&self, latency: ChatLatency) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.chat_latency = latency;
        self.persist(&guard)
    }

    fn persist(&self, data: &AppConfig) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
