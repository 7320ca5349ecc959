//! Store settings and their load/save lifecycle.
//!
//! Settings are persisted as key/value rows. [`SettingsService`] loads them
//! once at startup, hands out snapshots, and writes changes through to the
//! store before applying them in memory.

use crate::checkout::DEFAULT_TEMPLATE;
use crate::error::PersistenceError;
use crate::store::SettingsStore;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

pub const KEY_WHATSAPP_NUMBER: &str = "whatsapp_number";
pub const KEY_ADMIN_USERNAME: &str = "admin_username";
pub const KEY_ADMIN_PASSWORD: &str = "admin_password";
pub const KEY_MESSAGE_TEMPLATE: &str = "message_template";

pub const DEFAULT_WHATSAPP_NUMBER: &str = "5511999999999";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Operator-managed settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreSettings {
    /// Digits only.
    pub whatsapp_number: String,
    pub admin_username: String,
    /// Stored and compared as plain text.
    pub admin_password: String,
    pub message_template: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            message_template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl StoreSettings {
    /// Build from stored key/value rows; missing keys keep their defaults
    /// and unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                KEY_WHATSAPP_NUMBER => settings.whatsapp_number = value,
                KEY_ADMIN_USERNAME => settings.admin_username = value,
                KEY_ADMIN_PASSWORD => settings.admin_password = value,
                KEY_MESSAGE_TEMPLATE => settings.message_template = value,
                _ => {}
            }
        }
        settings
    }

    /// All settings as key/value rows.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (KEY_WHATSAPP_NUMBER, self.whatsapp_number.clone()),
            (KEY_ADMIN_USERNAME, self.admin_username.clone()),
            (KEY_ADMIN_PASSWORD, self.admin_password.clone()),
            (KEY_MESSAGE_TEMPLATE, self.message_template.clone()),
        ]
    }

    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = &patch.whatsapp_number {
            self.whatsapp_number = v.clone();
        }
        if let Some(v) = &patch.admin_username {
            self.admin_username = v.clone();
        }
        if let Some(v) = &patch.admin_password {
            self.admin_password = v.clone();
        }
        if let Some(v) = &patch.message_template {
            self.message_template = v.clone();
        }
    }
}

/// A partial settings change. Only set fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsPatch {
    pub whatsapp_number: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub message_template: Option<String>,
}

impl SettingsPatch {
    pub fn whatsapp_number(value: impl Into<String>) -> Self {
        Self {
            whatsapp_number: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn message_template(value: impl Into<String>) -> Self {
        Self {
            message_template: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_pairs().is_empty()
    }

    /// Set fields as key/value rows.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        [
            (KEY_WHATSAPP_NUMBER, &self.whatsapp_number),
            (KEY_ADMIN_USERNAME, &self.admin_username),
            (KEY_ADMIN_PASSWORD, &self.admin_password),
            (KEY_MESSAGE_TEMPLATE, &self.message_template),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key, v.clone())))
        .collect()
    }
}

/// Holds the current settings for the running process.
///
/// Constructed explicitly and shared through `Arc`.
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    current: RwLock<StoreSettings>,
}

impl SettingsService {
    /// Load settings from the store, falling back to defaults when it fails.
    pub async fn load(store: Arc<dyn SettingsStore>) -> Arc<Self> {
        let settings = match store.load_settings().await {
            Ok(settings) => {
                info!("Settings loaded");
                settings
            }
            Err(e) => {
                warn!(error = %e, "Could not load settings, using defaults");
                StoreSettings::default()
            }
        };
        Arc::new(Self::with_settings(store, settings))
    }

    /// Build with known settings without touching the store.
    pub fn with_settings(store: Arc<dyn SettingsStore>, settings: StoreSettings) -> Self {
        Self {
            store,
            current: RwLock::new(settings),
        }
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> StoreSettings {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Re-read settings from the store. On failure the current values stay.
    pub async fn reload(&self) -> Result<StoreSettings, PersistenceError> {
        let settings = self.store.load_settings().await?;
        self.replace(settings.clone());
        Ok(settings)
    }

    /// Save a patch, then apply it in memory.
    ///
    /// Nothing changes in memory if the save fails.
    pub async fn update(&self, patch: SettingsPatch) -> Result<StoreSettings, PersistenceError> {
        if patch.is_empty() {
            return Ok(self.snapshot());
        }
        self.store.save_settings(&patch).await?;

        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        current.apply(&patch);
        info!(keys = patch.to_pairs().len(), "Settings updated");
        Ok(current.clone())
    }

    fn replace(&self, settings: StoreSettings) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = settings;
    }
}
