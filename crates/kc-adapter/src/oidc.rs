//! Native Keycloak client.
//!
//! [`OidcClient`] performs the `init` half of the Keycloak adapter against the
//! standard OIDC endpoints of a realm:
//!
//! 1. Discover the realm's provider metadata.
//! 2. Complete a login callback (code + state + PKCE) if one was handed in.
//! 3. Otherwise validate a previously issued access token at `userinfo`.
//! 4. Otherwise, in `login-required` mode, build the login URL and hand it to
//!    the [`Redirector`].

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::callback::{CallbackParams, CallbackStore, InMemoryCallbackStore, PendingLogin};
use crate::client::{IdentityClient, IdentityClientFactory};
use crate::config::ClientConfig;
use crate::discovery::{self, ProviderMetadata};
use crate::error::{AdapterError, AdapterResult};
use crate::options::{InitOptions, OnLoad};
use crate::pkce::{generate_state, Pkce};
use crate::redirect::{LogRedirector, Redirector};

/// Redirect URI used when the caller supplies none.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost/";

/// Request timeout for provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tokens held by an authenticated client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenSet {
    /// Access token.
    pub access_token: String,

    /// Refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// ID token.
    #[serde(default)]
    pub id_token: Option<String>,

    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,

    /// Keycloak session state.
    #[serde(default)]
    pub session_state: Option<String>,
}

impl TokenSet {
    fn bearer(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            refresh_token: None,
            id_token: None,
            expires_in: None,
            session_state: None,
        }
    }
}

/// OAuth 2.0 error body returned by the token endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Keycloak client handle.
pub struct OidcClient {
    config: ClientConfig,
    http: reqwest::Client,
    callbacks: Arc<dyn CallbackStore>,
    redirector: Arc<dyn Redirector>,
    metadata: Option<ProviderMetadata>,
    tokens: Option<TokenSet>,
}

impl std::fmt::Debug for OidcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcClient")
            .field("config", &self.config)
            .field("metadata", &self.metadata)
            .field("authenticated", &self.tokens.is_some())
            .finish_non_exhaustive()
    }
}

impl OidcClient {
    /// Creates a client handle with no session.
    pub fn new(
        config: ClientConfig,
        http: reqwest::Client,
        callbacks: Arc<dyn CallbackStore>,
        redirector: Arc<dyn Redirector>,
    ) -> Self {
        Self {
            config,
            http,
            callbacks,
            redirector,
            metadata: None,
            tokens: None,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the provider metadata discovered by the last `init`.
    #[must_use]
    pub const fn metadata(&self) -> Option<&ProviderMetadata> {
        self.metadata.as_ref()
    }

    /// Returns the tokens of the current session.
    #[must_use]
    pub const fn tokens(&self) -> Option<&TokenSet> {
        self.tokens.as_ref()
    }

    /// Builds the login URL and records the pending login.
    ///
    /// # Errors
    ///
    /// Returns an error if the authorization endpoint is not a valid URL or
    /// the provider does not support the requested PKCE method.
    pub fn create_login_url(
        &self,
        metadata: &ProviderMetadata,
        options: &InitOptions,
    ) -> AdapterResult<Url> {
        let mut url = Url::parse(&metadata.authorization_endpoint)?;
        let redirect_uri = options
            .redirect_uri
            .as_ref()
            .map_or_else(|| DEFAULT_REDIRECT_URI.to_string(), Url::to_string);

        let pkce = match options.pkce_method {
            Some(method) if !metadata.supports_pkce(method) => {
                return Err(AdapterError::Protocol(format!(
                    "provider does not support PKCE method {method}"
                )));
            }
            Some(method) => Some(Pkce::generate(method)),
            None => None,
        };

        let state = generate_state();
        let nonce = generate_state();

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &redirect_uri)
                .append_pair("state", &state)
                .append_pair("response_mode", &options.response_mode.to_string())
                .append_pair("response_type", "code")
                .append_pair("scope", &options.effective_scope())
                .append_pair("nonce", &nonce);
            if let Some(pkce) = &pkce {
                query
                    .append_pair("code_challenge", &pkce.challenge)
                    .append_pair("code_challenge_method", &pkce.method.to_string());
            }
        }

        self.callbacks.add(PendingLogin::new(
            state,
            nonce,
            pkce.map(|p| p.verifier),
            redirect_uri,
        ));

        Ok(url)
    }

    /// Builds the logout URL for the current session.
    ///
    /// Returns `None` until `init` has discovered an end session endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the end session endpoint is not a valid URL.
    pub fn create_logout_url(&self, redirect_uri: Option<&Url>) -> AdapterResult<Option<Url>> {
        let Some(endpoint) = self
            .metadata
            .as_ref()
            .and_then(|m| m.end_session_endpoint.as_deref())
        else {
            return Ok(None);
        };

        let mut url = Url::parse(endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.config.client_id);
            if let Some(redirect_uri) = redirect_uri {
                query.append_pair("post_logout_redirect_uri", redirect_uri.as_str());
            }
            if let Some(id_token) = self.tokens.as_ref().and_then(|t| t.id_token.as_deref()) {
                query.append_pair("id_token_hint", id_token);
            }
        }
        Ok(Some(url))
    }

    async fn process_callback(
        &self,
        metadata: &ProviderMetadata,
        params: CallbackParams,
    ) -> AdapterResult<TokenSet> {
        if let Some(error) = params.error {
            let message = match params.error_description {
                Some(description) => format!("{error}: {description}"),
                None => error,
            };
            return Err(AdapterError::Callback(message));
        }

        let (Some(code), Some(state)) = (params.code, params.state) else {
            return Err(AdapterError::Callback("missing code or state".to_string()));
        };
        let pending = self.callbacks.take(&state).ok_or(AdapterError::InvalidState)?;

        tracing::debug!(client_id = %self.config.client_id, "exchanging authorization code");

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", pending.redirect_uri.as_str()),
        ];
        if let Some(verifier) = pending.code_verifier.as_deref() {
            form.push(("code_verifier", verifier));
        }

        let response = self
            .http
            .post(&metadata.token_endpoint)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body).map_or(body, |e| {
                e.error_description
                    .map_or_else(|| e.error.clone(), |d| format!("{}: {d}", e.error))
            });
            return Err(AdapterError::TokenExchange {
                status: status.as_u16(),
                message,
            });
        }

        let mut tokens: TokenSet = serde_json::from_str(&body)?;
        if tokens.session_state.is_none() {
            tokens.session_state = params.session_state;
        }
        Ok(tokens)
    }

    async fn check_token(&self, metadata: &ProviderMetadata, token: &str) -> AdapterResult<bool> {
        let endpoint = metadata.require_userinfo_endpoint()?;
        let response = self.http.get(endpoint).bearer_auth(token).send().await?;

        match response.status().as_u16() {
            200..=299 => Ok(true),
            401 | 403 => {
                tracing::debug!("stored token rejected by provider");
                Ok(false)
            }
            status => Err(AdapterError::Userinfo { status }),
        }
    }
}

#[async_trait]
impl IdentityClient for OidcClient {
    async fn init(&mut self, options: &InitOptions) -> AdapterResult<bool> {
        self.tokens = None;
        self.config.validate()?;

        let metadata = discovery::fetch(&self.http, &self.config.discovery_url()).await?;
        self.metadata = Some(metadata.clone());

        if let Some(callback_url) = &options.callback_url {
            let params = CallbackParams::parse(callback_url, options.response_mode);
            if params.is_callback() {
                let tokens = self.process_callback(&metadata, params).await?;
                self.tokens = Some(tokens);
                tracing::info!(realm = %self.config.realm, "login callback completed");
                return Ok(true);
            }
        }

        if let Some(token) = options.token.as_deref() {
            if self.check_token(&metadata, token).await? {
                self.tokens = Some(TokenSet::bearer(token));
                return Ok(true);
            }
        }

        match options.on_load {
            Some(OnLoad::LoginRequired) => {
                let url = self.create_login_url(&metadata, options)?;
                self.redirector.redirect(&url);
                Ok(false)
            }
            Some(OnLoad::CheckSso) | None => Ok(false),
        }
    }

    fn authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    fn token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }
}

/// Creates [`OidcClient`] handles sharing one HTTP pool, callback store and
/// redirector.
#[derive(Clone)]
pub struct OidcClientFactory {
    http: reqwest::Client,
    callbacks: Arc<dyn CallbackStore>,
    redirector: Arc<dyn Redirector>,
}

impl std::fmt::Debug for OidcClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcClientFactory").finish_non_exhaustive()
    }
}

impl OidcClientFactory {
    /// Creates a factory with an in-memory callback store and a logging
    /// redirector.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> AdapterResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_http(http))
    }

    /// Creates a factory around an existing HTTP client.
    #[must_use]
    pub fn with_http(http: reqwest::Client) -> Self {
        Self {
            http,
            callbacks: Arc::new(InMemoryCallbackStore::new()),
            redirector: Arc::new(LogRedirector),
        }
    }

    /// Replaces the callback store.
    #[must_use]
    pub fn with_callback_store(mut self, callbacks: Arc<dyn CallbackStore>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Replaces the redirector.
    #[must_use]
    pub fn with_redirector(mut self, redirector: Arc<dyn Redirector>) -> Self {
        self.redirector = redirector;
        self
    }
}

impl IdentityClientFactory for OidcClientFactory {
    type Client = OidcClient;

    fn create(&self, config: &ClientConfig) -> OidcClient {
        OidcClient::new(
            config.clone(),
            self.http.clone(),
            Arc::clone(&self.callbacks),
            Arc::clone(&self.redirector),
        )
    }
}
