//! Bootstrap CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Pending login file could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Adapter error.
    #[error(transparent)]
    Adapter(#[from] kc_adapter::AdapterError),
}

/// CLI result type.
pub type BootstrapResult<T> = Result<T, BootstrapError>;
