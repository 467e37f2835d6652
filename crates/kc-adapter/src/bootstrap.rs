//! Startup authentication bootstrap.
//!
//! [`AuthBootstrapper::initialize`] builds a fresh client handle, runs a single
//! `login-required` initialization and reports the result as one line on the
//! configured [`LogSink`]. Failures are contained: they are logged, never
//! retried and never returned as an error.

use crate::client::{IdentityClient, IdentityClientFactory};
use crate::config::ClientConfig;
use crate::error::AdapterError;
use crate::options::{InitOptions, OnLoad};
use crate::sink::LogSink;

/// Line written when a session was established.
pub const AUTHENTICATED: &str = "authenticated";

/// Line written when initialization completed without a session.
pub const NOT_AUTHENTICATED: &str = "not authenticated";

/// Line written when initialization was rejected.
pub const FAILED_TO_INITIALIZE: &str = "failed to initialize";

/// Result of a bootstrap run.
#[derive(Debug)]
pub enum InitOutcome {
    /// An authenticated session was established.
    Authenticated,
    /// Initialization completed without a session.
    NotAuthenticated,
    /// The client rejected initialization.
    Failed(AdapterError),
}

impl InitOutcome {
    /// Returns the status line for this outcome.
    #[must_use]
    pub const fn log_line(&self) -> &'static str {
        match self {
            Self::Authenticated => AUTHENTICATED,
            Self::NotAuthenticated => NOT_AUTHENTICATED,
            Self::Failed(_) => FAILED_TO_INITIALIZE,
        }
    }

    /// Returns whether a session was established.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Returns the initialization error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&AdapterError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Bootstraps a single authentication check at application startup.
#[derive(Debug)]
pub struct AuthBootstrapper<F, S> {
    config: ClientConfig,
    options: InitOptions,
    factory: F,
    sink: S,
}

impl<F, S> AuthBootstrapper<F, S>
where
    F: IdentityClientFactory,
    S: LogSink,
{
    /// Creates a bootstrapper with the `login-required` option set.
    pub fn new(config: ClientConfig, factory: F, sink: S) -> Self {
        Self {
            config,
            options: InitOptions::login_required(),
            factory,
            sink,
        }
    }

    /// Replaces the init options. The load policy stays `login-required`.
    #[must_use]
    pub fn with_options(mut self, options: InitOptions) -> Self {
        self.options = InitOptions {
            on_load: Some(OnLoad::LoginRequired),
            ..options
        };
        self
    }

    /// Returns the client configuration.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the init options.
    pub const fn options(&self) -> &InitOptions {
        &self.options
    }

    /// Runs one initialization against a fresh client handle.
    ///
    /// Writes exactly one line to the sink and never fails.
    pub async fn initialize(&self) -> InitOutcome {
        let mut client = self.factory.create(&self.config);

        let outcome = match client.init(&self.options).await {
            Ok(true) => InitOutcome::Authenticated,
            Ok(false) => InitOutcome::NotAuthenticated,
            Err(e) => InitOutcome::Failed(e),
        };
        drop(client);

        match &outcome {
            InitOutcome::Failed(e) => tracing::warn!(
                realm = %self.config.realm,
                client_id = %self.config.client_id,
                transport = e.is_transport(),
                error = %e,
                "identity provider initialization failed"
            ),
            _ => tracing::info!(
                realm = %self.config.realm,
                client_id = %self.config.client_id,
                authenticated = outcome.is_authenticated(),
                "identity provider initialized"
            ),
        }

        self.sink.write_line(outcome.log_line());
        outcome
    }
}
