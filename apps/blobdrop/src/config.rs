//! Application configuration.
//!
//! Read once at startup from an optional TOML file, then overlaid with
//! environment variables:
//! - File:  `~/.config/blobdrop/config.toml` (or `--config PATH`)
//! - Env:   `AZURE_STORAGE_RESOURCE_NAME`, `AZURE_STORAGE_SAS_TOKEN`,
//!          `AZURE_STORAGE_CONTAINER`, `AZURE_STORAGE_ENDPOINT`

use std::path::{Path, PathBuf};

use anyhow::Context;
use blobdrop_blob_storage::StorageConfig;
use serde::Deserialize;

pub const ENV_ACCOUNT: &str = "AZURE_STORAGE_RESOURCE_NAME";
pub const ENV_SAS_TOKEN: &str = "AZURE_STORAGE_SAS_TOKEN";
pub const ENV_CONTAINER: &str = "AZURE_STORAGE_CONTAINER";
pub const ENV_ENDPOINT: &str = "AZURE_STORAGE_ENDPOINT";

/// On-disk config file layout.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    storage: StorageConfig,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config file (if present) and applies the process environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config file loaded");
        Ok(Self {
            storage: file.storage,
        })
    }

    /// Overrides settings with non-empty values returned by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_ACCOUNT) {
            self.storage.account_name = v;
        }
        if let Some(v) = get(ENV_SAS_TOKEN) {
            self.storage.sas_token = v;
        }
        if let Some(v) = get(ENV_CONTAINER) {
            self.storage = std::mem::take(&mut self.storage).with_container(v);
        }
        if let Some(v) = get(ENV_ENDPOINT) {
            self.storage = std::mem::take(&mut self.storage).with_endpoint(v);
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    config_base_dir().map(|d| d.join("blobdrop").join("config.toml"))
}

fn config_base_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg));
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config"))
    }
}
