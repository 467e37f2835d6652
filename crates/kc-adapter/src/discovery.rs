//! `OpenID` Connect Discovery 1.0 client side.
//!
//! Only the fields the adapter consumes are modelled; anything else in the
//! provider's `.well-known/openid-configuration` document is ignored.

use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, AdapterResult};
use crate::options::CodeChallengeMethod;

/// `OpenID` Provider Metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// URL of the authorization server's issuer identifier.
    pub issuer: String,

    /// URL of the authorization endpoint.
    pub authorization_endpoint: String,

    /// URL of the token endpoint.
    pub token_endpoint: String,

    /// URL of the `UserInfo` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userinfo_endpoint: Option<String>,

    /// URL of the end session (logout) endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_session_endpoint: Option<String>,

    /// URL of the JSON Web Key Set document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks_uri: Option<String>,

    /// Supported code challenge methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_challenge_methods_supported: Option<Vec<String>>,
}

impl ProviderMetadata {
    /// Returns whether the provider advertises `method`.
    ///
    /// Providers that omit the list are assumed to accept any method.
    #[must_use]
    pub fn supports_pkce(&self, method: CodeChallengeMethod) -> bool {
        let method = method.to_string();
        self.code_challenge_methods_supported
            .as_ref()
            .map_or(true, |methods| methods.iter().any(|m| *m == method))
    }

    /// Returns the userinfo endpoint or a protocol error.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Protocol`] when the provider has none.
    pub fn require_userinfo_endpoint(&self) -> AdapterResult<&str> {
        self.userinfo_endpoint.as_deref().ok_or_else(|| {
            AdapterError::Protocol("provider does not expose a userinfo endpoint".to_string())
        })
    }
}

/// Fetches the discovery document at `url`.
///
/// # Errors
///
/// Returns [`AdapterError::Discovery`] on a non-success status and
/// [`AdapterError::Http`] on transport or decoding failures.
pub async fn fetch(http: &reqwest::Client, url: &str) -> AdapterResult<ProviderMetadata> {
    tracing::debug!(url, "fetching provider metadata");

    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AdapterError::Discovery {
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
