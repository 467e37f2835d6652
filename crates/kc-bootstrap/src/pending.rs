//! Pending logins kept between CLI runs.
//!
//! The run that prints the login URL and the run that receives
//! `--callback-url` are separate processes, so the state, nonce and PKCE
//! verifier live in a JSON file (`~/.keycloak/pending.json` by default).

use chrono::{Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kc_adapter::{default_pending_ttl, CallbackStore, PendingLogin};

use crate::error::{BootstrapError, BootstrapResult};

type PendingMap = HashMap<String, PendingLogin>;

/// File-backed pending login storage.
#[derive(Debug)]
pub struct FileCallbackStore {
    path: PathBuf,
    ttl: Duration,
    lock: Mutex<()>,
}

impl FileCallbackStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: default_pending_ttl(),
            lock: Mutex::new(()),
        }
    }

    /// Creates a store at `path`, or at the default location.
    pub fn open(path: Option<&Path>) -> BootstrapResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        Ok(Self::new(path))
    }

    /// Returns the default pending login file path.
    pub fn default_path() -> BootstrapResult<PathBuf> {
        let home = dirs_next::home_dir().ok_or_else(|| {
            BootstrapError::Config("could not determine home directory".to_string())
        })?;
        Ok(home.join(".keycloak").join("pending.json"))
    }

    /// Sets how long a login may wait for its callback.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BootstrapResult<PendingMap> {
        if !self.path.exists() {
            return Ok(PendingMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(PendingMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, pending: &PendingMap) -> BootstrapResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(pending)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn load_live(&self) -> PendingMap {
        let mut pending = self.load().unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "discarding unreadable pending logins"
            );
            PendingMap::new()
        });
        let now = Utc::now();
        pending.retain(|_, login| !login.is_expired_at(self.ttl, now));
        pending
    }

    fn store(&self, pending: &PendingMap) {
        if let Err(e) = self.save(pending) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to write pending logins"
            );
        }
    }
}

impl CallbackStore for FileCallbackStore {
    fn add(&self, login: PendingLogin) {
        let _guard = self.lock.lock();
        let mut pending = self.load_live();
        pending.insert(login.state.clone(), login);
        self.store(&pending);
    }

    fn take(&self, state: &str) -> Option<PendingLogin> {
        let _guard = self.lock.lock();
        let mut pending = self.load_live();
        let login = pending.remove(state);
        self.store(&pending);
        login
    }
}
