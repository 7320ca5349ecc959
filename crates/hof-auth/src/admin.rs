//! Login state for the admin panel.

use crate::credentials::credentials_match;
use crate::flag::AuthFlag;
use crate::AuthError;
use hof_cache::Cache;
use hof_commerce::settings::SettingsService;
use std::sync::Arc;
use tracing::{info, warn};

/// Checks admin credentials and keeps the authenticated flag.
pub struct AdminAuth {
    settings: Arc<SettingsService>,
    flag: AuthFlag,
}

impl AdminAuth {
    pub fn new(settings: Arc<SettingsService>, cache: Arc<Cache>) -> Self {
        Self {
            settings,
            flag: AuthFlag::new(cache),
        }
    }

    /// Compare against freshly loaded settings, or the last known ones
    /// when the reload fails. Sets the flag on success.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let settings = match self.settings.reload().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Could not refresh credentials, using last known settings");
                self.settings.snapshot()
            }
        };

        if !credentials_match(&settings, username, password) {
            warn!("Admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        self.flag.set()?;
        info!("Admin logged in");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.flag.clear()?;
        info!("Admin logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.flag.is_set()
    }

    /// Guard for admin operations.
    pub fn require(&self) -> Result<(), AuthError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AUTH_FLAG_KEY;
    use async_trait::async_trait;
    use hof_commerce::settings::{SettingsPatch, StoreSettings};
    use hof_commerce::store::{MemoryStore, SettingsStore};
    use hof_commerce::PersistenceError;

    struct OfflineSettings;

    #[async_trait]
    impl SettingsStore for OfflineSettings {
        async fn load_settings(&self) -> Result<StoreSettings, PersistenceError> {
            Err(PersistenceError::Unavailable("offline".into()))
        }

        async fn save_settings(&self, _patch: &SettingsPatch) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("offline".into()))
        }
    }

    async fn auth_with(store: Arc<dyn SettingsStore>) -> (AdminAuth, Arc<Cache>) {
        let settings = SettingsService::load(store).await;
        let cache = Arc::new(Cache::in_memory());
        (AdminAuth::new(settings, cache.clone()), cache)
    }

    #[tokio::test]
    async fn test_login_sets_and_logout_clears_flag() {
        let (auth, cache) = auth_with(Arc::new(MemoryStore::new())).await;
        assert!(!auth.is_authenticated());
        assert!(matches!(auth.require(), Err(AuthError::NotAuthenticated)));

        auth.login("admin", "admin123").await.unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(cache.get::<bool>(AUTH_FLAG_KEY).unwrap(), Some(true));
        assert!(auth.require().is_ok());

        auth.logout().unwrap();
        assert!(!auth.is_authenticated());
        assert!(!cache.exists(AUTH_FLAG_KEY).unwrap());
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_flag_unset() {
        let (auth, _cache) = auth_with(Arc::new(MemoryStore::new())).await;

        let err = auth.login("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(err.is_auth_failure());
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_sees_credentials_changed_in_store() {
        let store = Arc::new(MemoryStore::new());
        let (auth, _cache) = auth_with(store.clone()).await;

        store
            .save_settings(&SettingsPatch {
                admin_password: Some("segredo1".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(auth.login("admin", "admin123").await.is_err());
        auth.login("admin", "segredo1").await.unwrap();
    }

    #[tokio::test]
    async fn test_login_falls_back_to_last_known_settings() {
        let (auth, _cache) = auth_with(Arc::new(OfflineSettings)).await;
        auth.login("admin", "admin123").await.unwrap();
        assert!(auth.is_authenticated());
    }
}
