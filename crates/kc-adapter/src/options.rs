//! Initialization options.
//!
//! Mirrors the option set accepted by the Keycloak adapter's `init` call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// What to do on load when no session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnLoad {
    /// Force the user through the login page.
    #[serde(rename = "login-required")]
    LoginRequired,

    /// Only report whether a session already exists.
    #[serde(rename = "check-sso")]
    CheckSso,
}

impl fmt::Display for OnLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LoginRequired => "login-required",
            Self::CheckSso => "check-sso",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OnLoad {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login-required" => Ok(Self::LoginRequired),
            "check-sso" => Ok(Self::CheckSso),
            _ => Err(format!("unknown onLoad value: {s}")),
        }
    }
}

/// Completion style requested from the client.
///
/// Only native futures exist here; the variant is kept so option sets read
/// the same as the JavaScript adapter's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PromiseType {
    /// Native asynchronous completion.
    #[serde(rename = "native")]
    #[default]
    Native,
}

/// How authorization responses are returned to the redirect URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResponseMode {
    /// Query string parameters.
    #[serde(rename = "query")]
    Query,

    /// Fragment parameters.
    #[serde(rename = "fragment")]
    #[default]
    Fragment,
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Query => "query",
            Self::Fragment => "fragment",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "fragment" => Ok(Self::Fragment),
            _ => Err(format!("unknown response mode: {s}")),
        }
    }
}

/// PKCE code challenge methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CodeChallengeMethod {
    /// Plain code verifier.
    #[serde(rename = "plain")]
    Plain,

    /// SHA-256 hash of code verifier.
    #[serde(rename = "S256")]
    #[default]
    S256,
}

impl fmt::Display for CodeChallengeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::S256 => write!(f, "S256"),
        }
    }
}

impl FromStr for CodeChallengeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "S256" => Ok(Self::S256),
            _ => Err(format!("unknown code challenge method: {s}")),
        }
    }
}

/// Options passed to [`IdentityClient::init`](crate::IdentityClient::init).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitOptions {
    /// Load policy.
    pub on_load: Option<OnLoad>,

    /// Completion style.
    #[serde(default)]
    pub promise_type: PromiseType,

    /// PKCE method; `None` disables PKCE.
    #[serde(default = "default_pkce_method")]
    pub pkce_method: Option<CodeChallengeMethod>,

    /// Response mode used for the login redirect.
    #[serde(default)]
    pub response_mode: ResponseMode,

    /// Where the provider should send the user after login.
    pub redirect_uri: Option<Url>,

    /// Extra scopes; `openid` is always requested.
    pub scope: Option<String>,

    /// Access token from an earlier session.
    pub token: Option<String>,

    /// URL the provider redirected back to after login.
    pub callback_url: Option<Url>,
}

#[allow(clippy::unnecessary_wraps)]
fn default_pkce_method() -> Option<CodeChallengeMethod> {
    Some(CodeChallengeMethod::S256)
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            on_load: None,
            promise_type: PromiseType::default(),
            pkce_method: default_pkce_method(),
            response_mode: ResponseMode::default(),
            redirect_uri: None,
            scope: None,
            token: None,
            callback_url: None,
        }
    }
}

impl InitOptions {
    /// Options used by the bootstrapper: native completion, login required.
    #[must_use]
    pub fn login_required() -> Self {
        Self {
            on_load: Some(OnLoad::LoginRequired),
            ..Self::default()
        }
    }

    /// Options that only check for an existing session.
    #[must_use]
    pub fn check_sso() -> Self {
        Self {
            on_load: Some(OnLoad::CheckSso),
            ..Self::default()
        }
    }

    /// Sets the access token from an earlier session.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the URL the provider redirected back to.
    #[must_use]
    pub fn with_callback_url(mut self, url: Url) -> Self {
        self.callback_url = Some(url);
        self
    }

    /// Sets the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, url: Url) -> Self {
        self.redirect_uri = Some(url);
        self
    }

    /// Sets the response mode.
    #[must_use]
    pub const fn with_response_mode(mut self, mode: ResponseMode) -> Self {
        self.response_mode = mode;
        self
    }

    /// Sets the PKCE method; `None` disables PKCE.
    #[must_use]
    pub const fn with_pkce_method(mut self, method: Option<CodeChallengeMethod>) -> Self {
        self.pkce_method = method;
        self
    }

    /// Returns the scope string to request, always including `openid`.
    #[must_use]
    pub fn effective_scope(&self) -> String {
        match self.scope.as_deref().map(str::trim) {
            Some(scope) if scope.split_whitespace().any(|s| s == "openid") => scope.to_string(),
            Some(scope) if !scope.is_empty() => format!("openid {scope}"),
            _ => "openid".to_string(),
        }
    }
}
