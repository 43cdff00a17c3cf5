//! Authentication and authorization tests.

mod common;

use axum::http::{HeaderValue, Method, StatusCode};
use ldp_persistence::backends::memory::MemoryBackend;
use ldp_rest::ServerConfig;

use common::assertions::*;
use common::fixtures::*;
use common::harness::*;

fn secured_config() -> ServerConfig {
    ServerConfig {
        auth_enabled: true,
        users: "alice:secret:writer,bob:pw:reader".to_string(),
        ..ServerConfig::for_testing()
    }
}

async fn secured() -> RestTestHarness<MemoryBackend> {
    RestTestHarness::memory_with_config(secured_config()).await
}

#[tokio::test]
async fn test_anonymous_request_is_challenged() {
    let harness = secured().await;

    let response = harness.get("/rest/").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("www-authenticate").unwrap(),
        "Basic realm=\"ldp\""
    );
}

#[tokio::test]
async fn test_wrong_password_returns_401() {
    let harness = secured().await.login("alice", "nope");

    let response = harness.get("/rest/").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_user_returns_401() {
    let harness = secured().await.login("mallory", "secret");

    let response = harness.get("/rest/").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unsupported_scheme_returns_401() {
    let harness = secured().await;

    let response = harness
        .request(Method::GET, "/rest/")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer abc"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reader_can_read_but_not_write() {
    let harness = secured().await.login("bob", "pw");

    harness.get("/rest/").await.assert_status_ok();

    let response = harness.post_turtle("/rest/", &thing("Nope"), None).await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_constrained_by(&response);

    harness
        .delete("/rest/")
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_writer_can_create_and_read() {
    let harness = secured().await.login("alice", "secret");

    let path = harness.create("/rest/", "doc", &thing("Doc"), None).await;

    harness.get(&path).await.assert_status_ok();
}

#[tokio::test]
async fn test_health_does_not_require_credentials() {
    let harness = secured().await;

    harness.get("/health").await.assert_status_ok();
    harness.get("/_liveness").await.assert_status_ok();
    harness.get("/constraints").await.assert_status_ok();
}

#[tokio::test]
async fn test_disabled_auth_ignores_credentials() {
    let harness = RestTestHarness::memory().await.login("anyone", "anything");

    let response = harness.post_turtle("/rest/", &thing("Open"), None).await;

    response.assert_status(StatusCode::CREATED);
}
