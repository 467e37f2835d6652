//! # kc-bootstrap
//!
//! Command-line front end for the Keycloak authentication bootstrap.
//!
//! Resolves the client configuration from flags, environment and the config
//! file, runs a single `login-required` initialization and prints the outcome
//! line. Pending logins are kept on disk so a later run can complete them with
//! `--callback-url`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pending;

pub use cli::Cli;
pub use config::FileConfig;
pub use error::{BootstrapError, BootstrapResult};
pub use pending::FileCallbackStore;

use std::sync::Arc;

use kc_adapter::{AuthBootstrapper, ClientConfig, InitOutcome, OidcClientFactory, StdoutSink};

/// Resolves the client configuration for `cli`.
pub fn resolve_config(cli: &Cli) -> BootstrapResult<ClientConfig> {
    let config = FileConfig::load(cli.config.as_deref())?.resolve(&cli.overrides());
    config.validate()?;
    Ok(config)
}

/// Runs the bootstrap once and prints the outcome line on stdout.
pub async fn run(cli: &Cli) -> BootstrapResult<InitOutcome> {
    let config = resolve_config(cli)?;
    tracing::debug!(
        server_url = %config.server_url,
        realm = %config.realm,
        client_id = %config.client_id,
        "bootstrapping"
    );

    let callbacks = FileCallbackStore::open(cli.pending_file.as_deref())?;
    tracing::debug!(path = %callbacks.path().display(), "pending login file");

    let factory = OidcClientFactory::new()?
        .with_callback_store(Arc::new(callbacks))
        .with_redirector(Arc::new(output::ConsoleRedirector));
    let bootstrapper = AuthBootstrapper::new(config, factory, StdoutSink)
        .with_options(cli.init_options());

    Ok(bootstrapper.initialize().await)
}
