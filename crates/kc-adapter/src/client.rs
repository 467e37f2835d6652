//! Identity-provider client seam.
//!
//! The bootstrapper only ever talks to these traits. [`OidcClient`] is the
//! real implementation; tests substitute their own.
//!
//! [`OidcClient`]: crate::OidcClient

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::AdapterResult;
use crate::options::InitOptions;

/// Handle to an identity-provider client.
#[async_trait]
pub trait IdentityClient: Send {
    /// Initializes the client.
    ///
    /// Resolves to whether an authenticated session was established.
    async fn init(&mut self, options: &InitOptions) -> AdapterResult<bool>;

    /// Returns whether the last `init` established a session.
    fn authenticated(&self) -> bool;

    /// Returns the current access token, if any.
    fn token(&self) -> Option<&str>;
}

/// Constructs client handles from configuration.
///
/// Construction never fails; a bad configuration is reported by `init`.
pub trait IdentityClientFactory: Send + Sync {
    /// Client handle type.
    type Client: IdentityClient;

    /// Creates a fresh client handle.
    fn create(&self, config: &ClientConfig) -> Self::Client;
}
