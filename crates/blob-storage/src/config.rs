//! Storage account configuration.

use std::fmt;

use serde::Deserialize;

/// Container used when none is configured.
pub const DEFAULT_CONTAINER: &str = "tutorial-container";

/// Connection settings for one blob container.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Storage account name (the `{account}` in `{account}.blob.core.windows.net`).
    #[serde(default)]
    pub account_name: String,

    /// Shared access signature, with or without the leading `?`.
    #[serde(default)]
    pub sas_token: String,

    /// Target container name.
    #[serde(default = "default_container")]
    pub container: String,

    /// Overrides the blob service endpoint (Azurite, sovereign clouds, tests).
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_container() -> String {
    DEFAULT_CONTAINER.into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl StorageConfig {
    /// Creates a config for `account_name` using the default container.
    pub fn new(account_name: impl Into<String>, sas_token: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            sas_token: sas_token.into(),
            container: default_container(),
            endpoint: None,
        }
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Returns `true` iff both an account name and a SAS token are present.
    pub fn is_configured(&self) -> bool {
        !self.account_name.trim().is_empty() && !self.sas_token.trim().is_empty()
    }

    /// Blob service base URL without a trailing slash.
    pub fn endpoint_url(&self) -> String {
        match self.endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.blob.core.windows.net", self.account_name.trim()),
        }
    }

    /// SAS query string without the leading `?`.
    pub fn sas_query(&self) -> &str {
        self.sas_token.trim().trim_start_matches('?')
    }

    /// Container base URL without a trailing slash.
    pub fn container_url(&self) -> String {
        let container = if self.container.trim().is_empty() {
            DEFAULT_CONTAINER
        } else {
            self.container.trim()
        };
        format!("{}/{}", self.endpoint_url(), container)
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sas = if self.sas_token.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("StorageConfig")
            .field("account_name", &self.account_name)
            .field("sas_token", &sas)
            .field("container", &self.container)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_requires_account_and_token() {
        assert!(StorageConfig::new("acct", "sv=1&sig=x").is_configured());
        assert!(!StorageConfig::new("", "sv=1&sig=x").is_configured());
        assert!(!StorageConfig::new("acct", "").is_configured());
        assert!(!StorageConfig::new("  ", "  ").is_configured());
        assert!(!StorageConfig::default().is_configured());
    }

    #[test]
    fn default_endpoint_uses_account() {
        let cfg = StorageConfig::new("acct", "sig=x");
        assert_eq!(cfg.endpoint_url(), "https://acct.blob.core.windows.net");
        assert_eq!(
            cfg.container_url(),
            "https://acct.blob.core.windows.net/tutorial-container"
        );
    }

    #[test]
    fn endpoint_override_drops_trailing_slash() {
        let cfg = StorageConfig::new("devstoreaccount1", "sig=x")
            .with_endpoint("http://127.0.0.1:10000/devstoreaccount1/")
            .with_container("photos");
        assert_eq!(
            cfg.container_url(),
            "http://127.0.0.1:10000/devstoreaccount1/photos"
        );
    }

    #[test]
    fn sas_query_strips_question_mark() {
        let cfg = StorageConfig::new("acct", "?sv=2022-11-02&sig=abc");
        assert_eq!(cfg.sas_query(), "sv=2022-11-02&sig=abc");
    }

    #[test]
    fn default_uses_default_container() {
        let cfg = StorageConfig::default();
        assert_eq!(cfg.container, DEFAULT_CONTAINER);
        assert!(cfg.endpoint.is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = StorageConfig::new("acct", "sig=supersecret");
        let out = format!("{cfg:?}");
        assert!(!out.contains("supersecret"));
        assert!(out.contains("acct"));
    }
}
