//! # kc-adapter
//!
//! Keycloak client adapter and startup authentication bootstrap.
//!
//! This crate provides:
//! - [`AuthBootstrapper`] - runs one `login-required` initialization at
//!   startup and reports the outcome as a single log line
//! - [`IdentityClient`] / [`IdentityClientFactory`] - the seam between the
//!   bootstrapper and the identity provider
//! - [`OidcClient`] - native implementation against a Keycloak realm's
//!   `OpenID` Connect endpoints
//!
//! ## Modules
//!
//! - [`bootstrap`] - Startup bootstrapper and its outcome
//! - [`callback`] - Pending login storage and callback parsing
//! - [`client`] - Client traits
//! - [`config`] - Client configuration
//! - [`discovery`] - `OpenID` Provider Metadata
//! - [`error`] - Adapter error types
//! - [`oidc`] - Native Keycloak client
//! - [`options`] - Init options
//! - [`pkce`] - PKCE and state generation
//! - [`redirect`] - Login redirect targets
//! - [`sink`] - Line-oriented log sinks

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bootstrap;
pub mod callback;
pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod oidc;
pub mod options;
pub mod pkce;
pub mod redirect;
pub mod sink;

pub use bootstrap::{AuthBootstrapper, InitOutcome};
pub use callback::{
    default_pending_ttl, CallbackParams, CallbackStore, InMemoryCallbackStore, PendingLogin,
};
pub use client::{IdentityClient, IdentityClientFactory};
pub use config::ClientConfig;
pub use discovery::ProviderMetadata;
pub use error::{AdapterError, AdapterResult};
pub use oidc::{OidcClient, OidcClientFactory, TokenSet};
pub use options::{CodeChallengeMethod, InitOptions, OnLoad, PromiseType, ResponseMode};
pub use redirect::{LogRedirector, RecordingRedirector, Redirector};
pub use sink::{LogSink, MemorySink, StdoutSink, TracingSink};
