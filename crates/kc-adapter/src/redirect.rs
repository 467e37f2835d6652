//! Login redirects.

use parking_lot::Mutex;
use url::Url;

/// Receives the login URL when a session must be established.
///
/// A browser adapter navigates to it; native applications open it, print it,
/// or hand it to whatever drives the user agent.
pub trait Redirector: Send + Sync {
    /// Sends the user to `url`.
    fn redirect(&self, url: &Url);
}

/// Redirector that records the login URL as a tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRedirector;

impl Redirector for LogRedirector {
    fn redirect(&self, url: &Url) {
        tracing::info!(url = %url, "login required");
    }
}

/// Redirector that keeps every URL it receives.
#[derive(Debug, Default)]
pub struct RecordingRedirector {
    urls: Mutex<Vec<Url>>,
}

impl RecordingRedirector {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the URLs received so far.
    #[must_use]
    pub fn urls(&self) -> Vec<Url> {
        self.urls.lock().clone()
    }
}

impl Redirector for RecordingRedirector {
    fn redirect(&self, url: &Url) {
        self.urls.lock().push(url.clone());
    }
}
