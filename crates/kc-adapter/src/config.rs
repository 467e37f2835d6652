//! Client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AdapterError, AdapterResult};

/// Default Keycloak server URL (legacy `/auth` context path).
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/auth";

/// Default realm.
pub const DEFAULT_REALM: &str = "demo";

/// Default client identifier.
pub const DEFAULT_CLIENT_ID: &str = "fable-react-client";

/// Identity-provider client configuration.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the Keycloak server.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Realm the client is registered in.
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Client identifier within the realm.
    #[serde(default = "default_client_id")]
    pub client_id: String,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_realm() -> String {
    DEFAULT_REALM.to_string()
}

fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            realm: default_realm(),
            client_id: default_client_id(),
        }
    }
}

impl ClientConfig {
    /// Creates a new client configuration.
    pub fn new(
        server_url: impl Into<String>,
        realm: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            realm: realm.into(),
            client_id: client_id.into(),
        }
    }

    /// Checks that every field is present and the server URL parses.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Config`] naming the first blank field, or
    /// describing why `server_url` is not an absolute URL.
    pub fn validate(&self) -> AdapterResult<()> {
        for (name, value) in [
            ("server_url", &self.server_url),
            ("realm", &self.realm),
            ("client_id", &self.client_id),
        ] {
            if value.trim().is_empty() {
                return Err(AdapterError::Config(format!("{name} must not be empty")));
            }
        }
        Url::parse(self.server_url.trim()).map_err(|e| {
            AdapterError::Config(format!("server_url is not a valid URL: {e}"))
        })?;
        Ok(())
    }

    /// Returns the base URL of the configured realm.
    #[must_use]
    pub fn realm_url(&self) -> String {
        format!(
            "{}/realms/{}",
            self.server_url.trim_end_matches('/'),
            self.realm
        )
    }

    /// Returns the URL of the realm's `OpenID` discovery document.
    #[must_use]
    pub fn discovery_url(&self) -> String {
        format!("{}/.well-known/openid-configuration", self.realm_url())
    }
}
