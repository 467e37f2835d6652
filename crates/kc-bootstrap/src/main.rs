//! # Keycloak bootstrap
//!
//! Checks for an authenticated Keycloak session at startup.

#![forbid(unsafe_code)]

use clap::Parser;
use kc_bootstrap::{output::error, run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level().into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Initialization failures are reported on stdout and do not change the
    // exit code; only an unusable configuration does.
    if let Err(e) = run(&cli).await {
        error(&e.to_string());
        std::process::exit(1);
    }
}
