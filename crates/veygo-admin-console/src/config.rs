/*
[INPUT]:  Optional YAML configuration file
[OUTPUT]: Console configuration with client settings and credential location
[POS]:    Configuration layer - composition root inputs
[UPDATE]: When adding new configuration options
*/

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use veygo_admin_adapter::{
    AdminSession, ClientConfig, CredentialStore, JsonFilePersistence, VeygoClient,
};

/// Top-level configuration for the admin console
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConsoleConfig {
    /// Backend root, e.g. a staging deployment
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Send `Debug-Mode: ios` instead of `none`
    #[serde(default)]
    pub debug_mode: bool,
    /// Where the session credential is kept between runs
    #[serde(default)]
    pub credential_path: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            debug_mode: false,
            credential_path: None,
        }
    }
}

fn default_base_url() -> String {
    "https://dev.veygo.rent".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl ConsoleConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // an empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("parse config yaml")
    }

    /// File config when a path is given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            debug_mode: self.debug_mode,
        }
    }

    /// Configured credential file, or `<data dir>/veygo-admin/credential.json`.
    pub fn credential_path(&self) -> Result<PathBuf> {
        match &self.credential_path {
            Some(path) => Ok(path.clone()),
            None => Ok(dirs::data_dir()
                .ok_or_else(|| anyhow!("Could not determine data directory"))?
                .join("veygo-admin")
                .join("credential.json")),
        }
    }

    /// Wire client, credential store and queue together.
    pub fn build_session(&self) -> Result<AdminSession> {
        let client = VeygoClient::with_config_and_base_url(self.client_config(), &self.base_url)
            .context("build http client")?;
        let credential_path = self.credential_path()?;
        let store = CredentialStore::load(JsonFilePersistence::new(&credential_path))
            .with_context(|| format!("load credential {}", credential_path.display()))?;
        Ok(AdminSession::new(client, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::from_yaml("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.client_config().timeout, Duration::from_secs(30));
        assert!(!config.client_config().debug_mode);
    }

    #[test]
    fn test_partial_yaml() {
        let config = ConsoleConfig::from_yaml(
            "base_url: http://127.0.0.1:8080\ndebug_mode: true\ncredential_path: /tmp/veygo.json\n",
        )
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert!(config.debug_mode);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(
            config.credential_path().unwrap(),
            PathBuf::from("/tmp/veygo.json")
        );
    }

    #[test]
    fn test_rejects_bad_types() {
        assert!(ConsoleConfig::from_yaml("timeout_secs: soon\n").is_err());
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(ConsoleConfig::load(None).unwrap(), ConsoleConfig::default());
    }

    #[tokio::test]
    async fn test_malformed_credential_starts_signed_out() {
        let dir = std::env::temp_dir().join(format!("veygo-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let credential_path = dir.join("credential.json");
        std::fs::write(&credential_path, r#"{"token":"abc","user_id":"7"}"#).unwrap();

        let config = ConsoleConfig {
            credential_path: Some(credential_path),
            ..ConsoleConfig::default()
        };
        let session = config.build_session().unwrap();
        assert!(!session.credential().is_authenticated());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
