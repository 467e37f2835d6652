//! Terminal output.
//!
//! The outcome line is the only thing written to stdout; everything here goes
//! to stderr so the line can be piped.

use colored::Colorize;
use url::Url;

use kc_adapter::Redirector;

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Redirector that asks the user to open the login page.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRedirector;

impl Redirector for ConsoleRedirector {
    fn redirect(&self, url: &Url) {
        tracing::debug!(url = %url, "login required");
        info(&format!("Log in to continue: {url}"));
    }
}
