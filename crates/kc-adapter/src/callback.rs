//! Pending login storage.
//!
//! A login started in `login-required` mode leaves behind its state, nonce and
//! PKCE verifier. The callback that comes back from the provider consumes it.
//! Logins whose callback never arrives expire after a TTL.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

use crate::options::ResponseMode;

/// Default lifetime of a pending login, in seconds.
pub const PENDING_LOGIN_TTL_SECS: i64 = 30 * 60;

/// Returns the default lifetime of a pending login.
#[must_use]
pub fn default_pending_ttl() -> Duration {
    Duration::seconds(PENDING_LOGIN_TTL_SECS)
}

/// A login redirect awaiting its callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLogin {
    /// Opaque state sent with the authorization request.
    pub state: String,
    /// Nonce sent with the authorization request.
    pub nonce: String,
    /// PKCE verifier, if PKCE was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_verifier: Option<String>,
    /// Redirect URI sent with the authorization request.
    pub redirect_uri: String,
    /// When the login redirect was issued.
    pub created_at: DateTime<Utc>,
}

impl PendingLogin {
    /// Creates a pending login issued now.
    #[must_use]
    pub fn new(
        state: impl Into<String>,
        nonce: impl Into<String>,
        code_verifier: Option<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            nonce: nonce.into(),
            code_verifier,
            redirect_uri: redirect_uri.into(),
            created_at: Utc::now(),
        }
    }

    /// Checks if the login is older than `ttl` at `now`.
    #[must_use]
    pub fn is_expired_at(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now > self.created_at + ttl
    }

    /// Checks if the login is older than `ttl`.
    #[must_use]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.is_expired_at(ttl, Utc::now())
    }
}

/// Storage for pending logins.
///
/// Implementations drop logins older than their TTL: `take` never returns
/// an expired login.
pub trait CallbackStore: Send + Sync {
    /// Records a pending login.
    fn add(&self, login: PendingLogin);

    /// Removes and returns the pending login for `state`.
    fn take(&self, state: &str) -> Option<PendingLogin>;
}

/// In-memory pending login storage.
#[derive(Debug)]
pub struct InMemoryCallbackStore {
    pending: Mutex<HashMap<String, PendingLogin>>,
    ttl: Duration,
}

impl Default for InMemoryCallbackStore {
    fn default() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            ttl: default_pending_ttl(),
        }
    }
}

impl InMemoryCallbackStore {
    /// Creates an empty store with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how long a login may wait for its callback.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the number of logins awaiting a callback.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns whether no login is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Removes all expired logins and returns how many were dropped.
    pub fn remove_expired(&self) -> usize {
        let now = Utc::now();
        let mut pending = self.pending.lock();
        let before = pending.len();
        pending.retain(|_, login| !login.is_expired_at(self.ttl, now));
        before - pending.len()
    }
}

impl CallbackStore for InMemoryCallbackStore {
    fn add(&self, login: PendingLogin) {
        let now = Utc::now();
        let mut pending = self.pending.lock();
        pending.retain(|_, existing| !existing.is_expired_at(self.ttl, now));
        pending.insert(login.state.clone(), login);
    }

    fn take(&self, state: &str) -> Option<PendingLogin> {
        self.pending
            .lock()
            .remove(state)
            .filter(|login| !login.is_expired(self.ttl))
    }
}

/// Parameters parsed from a login callback URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code.
    pub code: Option<String>,
    /// Returned state.
    pub state: Option<String>,
    /// Error code, if the provider refused the login.
    pub error: Option<String>,
    /// Human-readable error description.
    pub error_description: Option<String>,
    /// Keycloak session state.
    pub session_state: Option<String>,
}

impl CallbackParams {
    /// Parses the callback parameters from the part of `url` that `mode` uses.
    #[must_use]
    pub fn parse(url: &Url, mode: ResponseMode) -> Self {
        let raw = match mode {
            ResponseMode::Query => url.query(),
            ResponseMode::Fragment => url.fragment(),
        }
        .unwrap_or_default();

        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let value = Some(value.into_owned());
            match key.as_ref() {
                "code" => params.code = value,
                "state" => params.state = value,
                "error" => params.error = value,
                "error_description" => params.error_description = value,
                "session_state" => params.session_state = value,
                _ => {}
            }
        }
        params
    }

    /// Returns whether the URL carried any OAuth callback parameters.
    #[must_use]
    pub const fn is_callback(&self) -> bool {
        self.error.is_some() || (self.code.is_some() && self.state.is_some())
    }
}
