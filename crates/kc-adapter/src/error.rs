//! Adapter error types.
//!
//! Every way an identity-provider initialization can be rejected is a variant
//! here. The bootstrapper only logs them.

use thiserror::Error;

/// Errors raised while initializing an identity-provider client.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Client configuration is incomplete or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The discovery document could not be fetched.
    #[error("discovery failed with status {status}")]
    Discovery {
        /// HTTP status code.
        status: u16,
    },

    /// The userinfo endpoint answered with an unexpected status.
    #[error("userinfo request failed with status {status}")]
    Userinfo {
        /// HTTP status code.
        status: u16,
    },

    /// The token endpoint rejected the authorization code.
    #[error("token exchange failed: {status} - {message}")]
    TokenExchange {
        /// HTTP status code.
        status: u16,
        /// Error message returned by the provider.
        message: String,
    },

    /// The provider redirected back with an error.
    #[error("login callback error: {0}")]
    Callback(String),

    /// No pending login matches the callback state.
    #[error("invalid or expired login state")]
    InvalidState,

    /// The provider metadata lacks something the flow needs.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl AdapterError {
    /// Returns whether this error came from the network layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Returns whether this error points at a misconfigured client.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidUrl(_))
    }
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
