//! CLI integration tests.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use clap::Parser;
use kc_adapter::{AdapterError, InitOutcome};
use kc_bootstrap::{resolve_config, run, BootstrapError, Cli};

use crate::common::{TestEnv, CLIENT_ID, REALM};

/// Flags override the config file, which overrides the defaults.
#[test]
fn test_config_precedence() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "server_url = \"https://sso.example.com/auth\"")?;
    writeln!(file, "client_id = \"portal\"")?;

    let path = file.path().to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["kc-bootstrap", "--config", &path, "--realm", "acme"])?;
    let config = resolve_config(&cli)?;

    assert_eq!(config.server_url, "https://sso.example.com/auth");
    assert_eq!(config.realm, "acme");
    assert_eq!(config.client_id, "portal");
    Ok(())
}

/// A blank client id is a configuration error, not an init failure.
#[test]
fn test_blank_client_id_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("adapter.toml");
    let path = path.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["kc-bootstrap", "--config", &path, "--client-id", " "])?;

    let err = resolve_config(&cli).unwrap_err();
    assert!(matches!(err, BootstrapError::Adapter(_)));
    Ok(())
}

/// A server URL that does not parse is rejected before anything runs.
#[test]
fn test_unparsable_server_url_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("adapter.toml");
    let path = path.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from([
        "kc-bootstrap",
        "--config",
        &path,
        "--server-url",
        "not a url",
    ])?;

    let err = resolve_config(&cli).unwrap_err();
    assert!(matches!(err, BootstrapError::Adapter(AdapterError::Config(_))));
    Ok(())
}

/// Builds CLI args pointing at the mock realm, with files under `dir`.
fn realm_args(env: &TestEnv, dir: &Path) -> Vec<String> {
    vec![
        "kc-bootstrap".to_string(),
        "--config".to_string(),
        dir.join("adapter.toml").to_string_lossy().into_owned(),
        "--pending-file".to_string(),
        dir.join("pending.json").to_string_lossy().into_owned(),
        "--server-url".to_string(),
        env.server_url(),
        "--realm".to_string(),
        REALM.to_string(),
        "--client-id".to_string(),
        CLIENT_ID.to_string(),
    ]
}

/// Running against a provider that rejects discovery still succeeds.
#[tokio::test]
async fn test_run_contains_initialization_failure() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let dir = tempfile::tempdir()?;

    let cli = Cli::try_parse_from(realm_args(&env, dir.path()))?;

    let outcome = run(&cli).await?;
    assert!(matches!(outcome, InitOutcome::Failed(_)));
    Ok(())
}

/// Running against a healthy provider without a session asks for a login.
#[tokio::test]
async fn test_run_without_session_is_not_authenticated() -> anyhow::Result<()> {
    let env = TestEnv::new();
    env.mount_discovery();
    let dir = tempfile::tempdir()?;

    let cli = Cli::try_parse_from(realm_args(&env, dir.path()))?;

    let outcome = run(&cli).await?;
    assert!(matches!(outcome, InitOutcome::NotAuthenticated));
    Ok(())
}

/// A login started by one run is completed by a later run's callback.
#[tokio::test]
async fn test_callback_completes_login_from_earlier_run() -> anyhow::Result<()> {
    let env = TestEnv::new();
    env.mount_discovery();
    let token = env.mount_token("a1b2c3");
    let dir = tempfile::tempdir()?;

    let first = Cli::try_parse_from(realm_args(&env, dir.path()))?;
    assert!(matches!(run(&first).await?, InitOutcome::NotAuthenticated));

    let content = std::fs::read_to_string(dir.path().join("pending.json"))?;
    let pending: HashMap<String, serde_json::Value> = serde_json::from_str(&content)?;
    assert_eq!(pending.len(), 1);
    let state = pending.keys().next().cloned().unwrap_or_default();

    let mut args = realm_args(&env, dir.path());
    args.push("--callback-url".to_string());
    args.push(format!("http://localhost/#state={state}&code=a1b2c3"));
    let second = Cli::try_parse_from(args)?;

    assert!(matches!(run(&second).await?, InitOutcome::Authenticated));
    assert_eq!(token.calls(), 1);

    let content = std::fs::read_to_string(dir.path().join("pending.json"))?;
    let pending: HashMap<String, serde_json::Value> = serde_json::from_str(&content)?;
    assert!(pending.is_empty());
    Ok(())
}

/// Replaying the same callback in a third run fails the initialization.
#[tokio::test]
async fn test_callback_cannot_be_replayed_across_runs() -> anyhow::Result<()> {
    let env = TestEnv::new();
    env.mount_discovery();
    env.mount_token("a1b2c3");
    let dir = tempfile::tempdir()?;

    run(&Cli::try_parse_from(realm_args(&env, dir.path()))?).await?;
    let content = std::fs::read_to_string(dir.path().join("pending.json"))?;
    let pending: HashMap<String, serde_json::Value> = serde_json::from_str(&content)?;
    let state = pending.keys().next().cloned().unwrap_or_default();

    let mut args = realm_args(&env, dir.path());
    args.push("--callback-url".to_string());
    args.push(format!("http://localhost/#state={state}&code=a1b2c3"));

    assert!(matches!(
        run(&Cli::try_parse_from(args.clone())?).await?,
        InitOutcome::Authenticated
    ));
    assert!(matches!(
        run(&Cli::try_parse_from(args)?).await?,
        InitOutcome::Failed(AdapterError::InvalidState)
    ));
    Ok(())
}
