//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use mart_commerce::api::ApiConfig;
use mart_commerce::checkout::DeliveryOption;
use mart_observability::LogConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["mart.toml", ".mart.toml", "mart.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MartConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ApiSection,

    /// Local storage for the token, comparison list and recent searches.
    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub logging: LogConfig,

    #[serde(default)]
    pub checkout: CheckoutSection,
}

impl MartConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
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

    /// Find a config file in `start` or any parent directory.
    pub fn find(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Apply `MART_API_URL` and `MART_DATA_DIR`. The token override is
    /// read by the context, since it never lands in the file.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("MART_API_URL").ok(),
            std::env::var("MART_DATA_DIR").ok(),
        );
    }

    fn apply_overrides(&mut self, api_url: Option<String>, data_dir: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Connection settings for the API client.
    pub fn api_config(&self) -> ApiConfig {
        let mut config = ApiConfig::new(self.api.base_url.clone());
        config.timeout = Duration::from_secs(self.api.timeout_secs);
        config.connect_timeout = Duration::from_secs(self.api.connect_timeout_secs);
        config.cart_timeout = Duration::from_secs(self.api.cart_timeout_secs);
        config
    }

    /// Directory for local storage.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| dirs_path().join("mart"))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSection {
    /// REST API root, e.g. `http://localhost:8000/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Cart calls get a longer budget.
    #[serde(default = "default_cart_timeout")]
    pub cart_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_cart_timeout() -> u64 {
    20
}

fn default_connect_timeout() -> u64 {
    5
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            cart_timeout_secs: default_cart_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Local storage settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Defaults to `~/.local/share/mart`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Checkout defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSection {
    #[serde(default)]
    pub default_delivery: DeliveryOption,
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

/// Generate a default mart.toml config file.
pub fn generate_default_config(base_url: &str) -> String {
    format!(
        r#"# Mart storefront configuration

[api]
base_url = "{base_url}"
timeout_secs = 10
cart_timeout_secs = 20
connect_timeout_secs = 5

[storage]
# data_dir = "~/.local/share/mart"

[logging]
level = "warn"
format = "human"

[checkout]
# express, standard or scheduled
default_delivery = "standard"
"#,
        base_url = base_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses() {
        let config: MartConfig = toml::from_str(&generate_default_config("https://b2b.example.in/api")).unwrap();
        assert_eq!(config.api.base_url, "https://b2b.example.in/api");
        assert_eq!(config.api.cart_timeout_secs, 20);
        assert_eq!(config.checkout.default_delivery, DeliveryOption::Standard);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: MartConfig = toml::from_str("[checkout]\ndefault_delivery = \"express\"\n").unwrap();
        assert_eq!(config.api, ApiSection::default());
        assert_eq!(config.checkout.default_delivery, DeliveryOption::Express);
    }

    #[test]
    fn test_overrides() {
        let mut config = MartConfig::default();
        config.apply_overrides(Some("http://shop.test/api".to_string()), Some(" ".to_string()));
        assert_eq!(config.api.base_url, "http://shop.test/api");
        assert!(config.storage.data_dir.is_none());

        config.apply_overrides(None, Some("/var/mart".to_string()));
        assert_eq!(config.data_dir(), PathBuf::from("/var/mart"));
    }

    #[test]
    fn test_find_searches_parents() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert!(MartConfig::find(&nested).is_none());

        std::fs::write(root.path().join(".mart.toml"), "").unwrap();
        assert_eq!(MartConfig::find(&nested), Some(root.path().join(".mart.toml")));
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mart.json");
        let mut config = MartConfig::default();
        config.api.timeout_secs = 30;
        config.save(&path).unwrap();
        assert_eq!(MartConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_api_config() {
        let api = MartConfig::default().api_config();
        assert_eq!(api.cart_timeout, Duration::from_secs(20));
        assert_eq!(api.connect_timeout, Duration::from_secs(5));
    }
}
