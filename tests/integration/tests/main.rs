//! End-to-End Integration Tests
//!
//! These tests drive the bootstrapper and the CLI against a fake Keycloak
//! realm served by `httpmock`.

mod bootstrap_flow;
mod cli;
