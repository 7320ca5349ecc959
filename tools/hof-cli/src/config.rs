//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use hof_commerce::checkout::{CheckoutOptions, DEFAULT_MESSAGING_HOST};
use hof_commerce::Currency;
use serde::{Deserialize, Serialize};

/// Config file names searched from the working directory upward.
pub const CONFIG_NAMES: [&str; 3] = ["hof.toml", ".hof.toml", "hof.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Database connection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Storefront behaviour.
    #[serde(default)]
    pub storefront: StorefrontConfig,

    /// Local device storage.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content, is_json(path))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str, json: bool) -> Result<Self> {
        if json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Connection string: the `url_env` variable wins over `url`.
    pub fn database_url(&self) -> Option<String> {
        std::env::var(&self.database.url_env)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.database.url.clone())
    }

    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.storefront.currency)
            .with_context(|| format!("Unknown currency: {}", self.storefront.currency))
    }

    pub fn checkout_options(&self) -> CheckoutOptions {
        CheckoutOptions {
            messaging_host: self.storefront.messaging_host.clone(),
            reload_delay: Duration::from_millis(self.storefront.reload_delay_ms),
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string used when the environment variable is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Environment variable holding the connection string.
    #[serde(default = "default_url_env")]
    pub url_env: String,

    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_url_env() -> String {
    "DATABASE_URL".to_string()
}

fn default_max_connections() -> u32 {
    hof_db::DEFAULT_MAX_CONNECTIONS
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            url_env: default_url_env(),
            max_connections: default_max_connections(),
        }
    }
}

/// Storefront settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// ISO currency code for prices.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Host of the messaging deep link.
    #[serde(default = "default_messaging_host")]
    pub messaging_host: String,

    /// Delay before the session reload after checkout.
    #[serde(default = "default_reload_delay_ms")]
    pub reload_delay_ms: u64,
}

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_messaging_host() -> String {
    DEFAULT_MESSAGING_HOST.to_string()
}

fn default_reload_delay_ms() -> u64 {
    1000
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            messaging_host: default_messaging_host(),
            reload_delay_ms: default_reload_delay_ms(),
        }
    }
}

/// Local device storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the local state. Defaults to the user data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Generate a default hof.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Help HOF storefront configuration

[database]
# url = "postgres://localhost/helphof"
url_env = "DATABASE_URL"
max_connections = {max_connections}

[storefront]
currency = "BRL"
messaging_host = "{host}"
reload_delay_ms = 1000

[storage]
# path = ".hof/storage.json"
"#,
        max_connections = hof_db::DEFAULT_MAX_CONNECTIONS,
        host = DEFAULT_MESSAGING_HOST,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CliConfig::parse("", false).unwrap();
        assert_eq!(config.database.url_env, "DATABASE_URL");
        assert_eq!(config.storefront.messaging_host, "wa.me");
        assert_eq!(config.storefront.reload_delay_ms, 1000);
        assert_eq!(config.currency().unwrap(), Currency::BRL);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_generated_config_parses() {
        let config = CliConfig::parse(&generate_default_config(), false).unwrap();
        assert_eq!(config.database.max_connections, hof_db::DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.checkout_options(), CheckoutOptions::default());
    }

    #[test]
    fn test_json_config() {
        let config = CliConfig::parse(
            r#"{"storefront": {"messaging_host": "api.whatsapp.com", "reload_delay_ms": 0}}"#,
            true,
        )
        .unwrap();
        assert_eq!(config.storefront.messaging_host, "api.whatsapp.com");
        assert_eq!(config.checkout_options().reload_delay, Duration::ZERO);
    }

    #[test]
    fn test_url_falls_back_to_file_value() {
        let config = CliConfig::parse(
            r#"
            [database]
            url = "postgres://localhost/helphof"
            url_env = "HOF_TEST_UNSET_DATABASE_URL"
            "#,
            false,
        )
        .unwrap();
        assert_eq!(
            config.database_url().as_deref(),
            Some("postgres://localhost/helphof")
        );
    }

    #[test]
    fn test_unknown_currency_is_error() {
        let config = CliConfig::parse("[storefront]\ncurrency = \"XYZ\"", false).unwrap();
        assert!(config.currency().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hof.toml");

        let mut config = CliConfig::default();
        config.storage.path = Some("state.json".to_string());
        config.save(&path).unwrap();

        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded.storage.path.as_deref(), Some("state.json"));
    }
}
