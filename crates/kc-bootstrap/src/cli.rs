//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;
use url::Url;

use kc_adapter::{CodeChallengeMethod, InitOptions, ResponseMode};

use crate::config::FileConfig;

/// Keycloak bootstrap - checks for an authenticated session at startup.
#[derive(Debug, Parser)]
#[command(name = "kc-bootstrap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Keycloak server URL (overrides config).
    #[arg(short, long, env = "KC_SERVER_URL")]
    pub server_url: Option<String>,

    /// Realm (overrides config).
    #[arg(short, long, env = "KC_REALM")]
    pub realm: Option<String>,

    /// Client ID (overrides config).
    #[arg(short, long, env = "KC_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Access token from an earlier session.
    #[arg(long, env = "KC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// URL the provider redirected back to after login.
    #[arg(long)]
    pub callback_url: Option<Url>,

    /// Redirect URI to send with the login request.
    #[arg(long)]
    pub redirect_uri: Option<Url>,

    /// Response mode for the login redirect (query or fragment).
    #[arg(long, default_value = "fragment")]
    pub response_mode: ResponseMode,

    /// Extra scopes to request.
    #[arg(long)]
    pub scope: Option<String>,

    /// Disable PKCE.
    #[arg(long)]
    pub no_pkce: bool,

    /// Config file path (defaults to ~/.keycloak/adapter.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pending login file (defaults to ~/.keycloak/pending.json).
    #[arg(long, env = "KC_PENDING_FILE")]
    pub pending_file: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Returns the client settings given on the command line.
    #[must_use]
    pub fn overrides(&self) -> FileConfig {
        FileConfig {
            server_url: self.server_url.clone(),
            realm: self.realm.clone(),
            client_id: self.client_id.clone(),
        }
    }

    /// Builds the init options.
    #[must_use]
    pub fn init_options(&self) -> InitOptions {
        let pkce_method = if self.no_pkce {
            None
        } else {
            Some(CodeChallengeMethod::S256)
        };

        InitOptions {
            redirect_uri: self.redirect_uri.clone(),
            scope: self.scope.clone(),
            token: self.token.clone(),
            callback_url: self.callback_url.clone(),
            ..InitOptions::login_required()
        }
        .with_response_mode(self.response_mode)
        .with_pkce_method(pkce_method)
    }

    /// Returns the default tracing filter.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
