//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use hof_auth::AdminAuth;
use hof_cache::Cache;
use hof_commerce::admin::AdminPanel;
use hof_commerce::settings::SettingsService;
use hof_commerce::store::{CatalogStore, MemoryStore, OrderStore, SettingsStore};
use hof_db::{Db, PgStore};
use tracing::info;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::{ConsoleNotifier, Output};

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Use a seeded in-memory store instead of the database.
    pub offline: bool,
}

/// Connected storage plus the settings loaded from it.
pub struct Services {
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderStore>,
    pub settings: Arc<SettingsService>,
}

impl Services {
    async fn over<S>(store: Arc<S>) -> Self
    where
        S: CatalogStore + OrderStore + SettingsStore + 'static,
    {
        let settings = SettingsService::load(store.clone()).await;
        Self {
            catalog: store.clone(),
            orders: store,
            settings,
        }
    }
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output, offline: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CliConfig::load(&path)?, Some(path))
            }
            // Try to find config in current directory or parent directories
            None => match Self::find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            offline,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Local device storage file.
    pub fn storage_path(&self) -> PathBuf {
        match &self.config.storage.path {
            Some(path) => resolve(&self.cwd, path),
            None => dirs_path().join("helphof").join("storage.json"),
        }
    }

    pub fn cache(&self) -> Result<Arc<Cache>> {
        let path = self.storage_path();
        let cache = Cache::open(&path)
            .with_context(|| format!("Failed to open local storage: {}", path.display()))?;
        Ok(Arc::new(cache))
    }

    /// Connect to the database without loading anything.
    pub async fn connect(&self) -> Result<Db> {
        if self.offline {
            bail!("This command needs a database and cannot run with --offline");
        }
        let url = self.config.database_url().with_context(|| {
            format!(
                "No database configured. Set {} or [database] url in hof.toml",
                self.config.database.url_env
            )
        })?;

        let spinner = self.output.spinner("Conectando ao banco de dados...");
        let db = Db::connect(&url, self.config.database.max_connections).await;
        spinner.finish_and_clear();
        Ok(db?)
    }

    /// Connect (or build the offline store) and load settings.
    pub async fn services(&self) -> Result<Services> {
        let currency = self.config.currency()?;
        if self.offline {
            info!("Using in-memory store with the starter catalog");
            return Ok(Services::over(Arc::new(MemoryStore::seeded(currency))).await);
        }
        let db = self.connect().await?;
        Ok(Services::over(Arc::new(PgStore::new(db, currency))).await)
    }

    pub fn auth(&self, services: &Services) -> Result<AdminAuth> {
        Ok(AdminAuth::new(services.settings.clone(), self.cache()?))
    }

    /// Admin panel for an authenticated operator.
    pub fn admin(&self, services: &Services) -> Result<AdminPanel> {
        self.auth(services)?.require()?;
        Ok(AdminPanel::new(
            services.catalog.clone(),
            services.orders.clone(),
            services.settings.clone(),
            Arc::new(ConsoleNotifier::new(self.output.clone())),
        ))
    }
}

/// Resolve a path relative to the working directory.
fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(data) = std::env::var_os("XDG_DATA_HOME") {
        PathBuf::from(data)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hof.toml"), "").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            Context::find_config(&nested),
            Some(dir.path().join("hof.toml"))
        );
    }

    #[test]
    fn test_resolve_relative_paths() {
        let cwd = Path::new("/srv/helphof");
        assert_eq!(resolve(cwd, "state.json"), PathBuf::from("/srv/helphof/state.json"));
        assert_eq!(resolve(cwd, "/tmp/state.json"), PathBuf::from("/tmp/state.json"));
    }
}
