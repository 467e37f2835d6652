//! Config file handling.
//!
//! Values resolve in order: command line or environment, then the config
//! file, then the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use kc_adapter::ClientConfig;

use crate::error::{BootstrapError, BootstrapResult};

/// Contents of the adapter config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Keycloak server URL.
    pub server_url: Option<String>,
    /// Realm name.
    pub realm: Option<String>,
    /// Client identifier.
    pub client_id: Option<String>,
}

impl FileConfig {
    /// Loads the config file at `path`, or the default location.
    ///
    /// A missing file yields an empty config.
    pub fn load(path: Option<&Path>) -> BootstrapResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns the default config file path.
    pub fn default_path() -> BootstrapResult<PathBuf> {
        let home = dirs_next::home_dir().ok_or_else(|| {
            BootstrapError::Config("could not determine home directory".to_string())
        })?;
        Ok(home.join(".keycloak").join("adapter.toml"))
    }

    /// Resolves the client configuration, letting `overrides` win.
    #[must_use]
    pub fn resolve(self, overrides: &FileConfig) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            server_url: overrides
                .server_url
                .clone()
                .or(self.server_url)
                .unwrap_or(defaults.server_url),
            realm: overrides
                .realm
                .clone()
                .or(self.realm)
                .unwrap_or(defaults.realm),
            client_id: overrides
                .client_id
                .clone()
                .or(self.client_id)
                .unwrap_or(defaults.client_id),
        }
    }
}
