//! Bootstrap flow integration tests.

use std::collections::HashMap;

use kc_adapter::{AdapterError, InitOptions, InitOutcome};
use url::Url;

use crate::common::{TestEnv, CLIENT_ID};

/// No session and no callback: the user is sent to the login page.
#[tokio::test]
async fn test_login_required_without_session() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let discovery = env.mount_discovery();

    let outcome = env.bootstrapper().initialize().await;

    assert!(matches!(outcome, InitOutcome::NotAuthenticated));
    assert_eq!(env.sink.lines(), vec!["not authenticated"]);
    assert_eq!(discovery.calls(), 1);

    let urls = env.redirector.urls();
    assert_eq!(urls.len(), 1, "exactly one login redirect");
    assert!(urls[0].as_str().starts_with(&env.endpoint("auth")));
    assert_eq!(env.callbacks.len(), 1);
    Ok(())
}

/// The full round trip: redirect, then callback, then an authenticated start.
#[tokio::test]
async fn test_login_round_trip() -> anyhow::Result<()> {
    let env = TestEnv::new();
    env.mount_discovery();
    let token = env.mount_token("a1b2c3");

    let first = env.bootstrapper().initialize().await;
    assert!(matches!(first, InitOutcome::NotAuthenticated));

    let login_url = env.redirector.urls().remove(0);
    let query: HashMap<String, String> = login_url.query_pairs().into_owned().collect();
    assert_eq!(query["client_id"], CLIENT_ID);
    assert_eq!(query["code_challenge_method"], "S256");

    let callback = Url::parse(&format!(
        "http://localhost/#state={}&session_state=d2b1c6f0&code=a1b2c3",
        query["state"]
    ))?;
    let second = env
        .bootstrapper()
        .with_options(InitOptions::login_required().with_callback_url(callback))
        .initialize()
        .await;

    assert!(second.is_authenticated());
    assert_eq!(token.calls(), 1);
    assert_eq!(env.sink.lines(), vec!["not authenticated", "authenticated"]);
    assert!(env.callbacks.is_empty(), "pending login consumed");
    assert_eq!(env.redirector.urls().len(), 1, "no second redirect");
    Ok(())
}

/// A callback replayed after it was consumed is rejected.
#[tokio::test]
async fn test_replayed_callback_fails() -> anyhow::Result<()> {
    let env = TestEnv::new();
    env.mount_discovery();
    env.mount_token("a1b2c3");

    env.bootstrapper().initialize().await;
    let state = env
        .redirector
        .urls()
        .remove(0)
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .expect("state parameter");

    let callback = Url::parse(&format!("http://localhost/#state={state}&code=a1b2c3"))?;
    let options = InitOptions::login_required().with_callback_url(callback);
    let bootstrapper = env.bootstrapper().with_options(options);

    assert!(bootstrapper.initialize().await.is_authenticated());
    let replay = bootstrapper.initialize().await;

    assert!(matches!(replay.error(), Some(AdapterError::InvalidState)));
    assert_eq!(
        env.sink.lines(),
        vec!["not authenticated", "authenticated", "failed to initialize"]
    );
    Ok(())
}

/// A token from an earlier session is accepted without a redirect.
#[tokio::test]
async fn test_existing_token_is_authenticated() -> anyhow::Result<()> {
    let env = TestEnv::new();
    env.mount_discovery();
    let userinfo = env.mount_userinfo("eyJhbGciOiJFUzM4NCJ9.access", 200);

    let outcome = env
        .bootstrapper()
        .with_options(InitOptions::login_required().with_token("eyJhbGciOiJFUzM4NCJ9.access"))
        .initialize()
        .await;

    assert!(outcome.is_authenticated());
    assert_eq!(userinfo.calls(), 1);
    assert_eq!(env.sink.lines(), vec!["authenticated"]);
    assert!(env.redirector.urls().is_empty());
    Ok(())
}

/// An expired token leads back to the login page.
#[tokio::test]
async fn test_expired_token_requires_login() -> anyhow::Result<()> {
    let env = TestEnv::new();
    env.mount_discovery();
    env.mount_userinfo("stale", 401);

    let outcome = env
        .bootstrapper()
        .with_options(InitOptions::login_required().with_token("stale"))
        .initialize()
        .await;

    assert!(matches!(outcome, InitOutcome::NotAuthenticated));
    assert_eq!(env.redirector.urls().len(), 1);
    Ok(())
}

/// A realm the provider does not know fails initialization without raising.
#[tokio::test]
async fn test_unknown_realm_fails_to_initialize() -> anyhow::Result<()> {
    let env = TestEnv::new();
    env.mount_discovery();

    let mut config = env.config();
    config.realm = "missing".to_string();
    let outcome = kc_adapter::AuthBootstrapper::new(config, env.factory(), env.sink.clone())
        .initialize()
        .await;

    assert!(matches!(
        outcome.error(),
        Some(AdapterError::Discovery { status: 404 })
    ));
    assert_eq!(env.sink.lines(), vec!["failed to initialize"]);
    Ok(())
}

/// An unreachable provider fails initialization without raising.
#[tokio::test]
async fn test_unreachable_provider_fails_to_initialize() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let mut config = env.config();
    // Port 9 (discard) is not served by anything in the test environment.
    config.server_url = "http://127.0.0.1:9/auth".to_string();

    let outcome = kc_adapter::AuthBootstrapper::new(config, env.factory(), env.sink.clone())
        .initialize()
        .await;

    assert!(outcome.error().is_some_and(AdapterError::is_transport));
    assert_eq!(env.sink.lines(), vec!["failed to initialize"]);
    Ok(())
}
