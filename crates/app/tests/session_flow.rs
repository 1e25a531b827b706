//! End-to-end session flow against a mocked token API.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};
use tenant_auth::Host;
use tenant_auth_domain::AuthenticationState;
use tenant_auth_infrastructure::AuthClientConfig;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn unsigned_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

fn access_token(email: &str) -> String {
    unsigned_token(&json!({
        "tenant": "root",
        "email": email,
        "fullName": "Root Admin",
        "permission": ["Permissions.Users.View", "Permissions.Users.Create"],
        "exp": 1_893_456_000,
    }))
}

fn config(server: &MockServer, dir: &TempDir) -> AuthClientConfig {
    AuthClientConfig {
        api_base_url: server.uri(),
        tenant: "root".to_string(),
        session_file: dir.path().join("session.json"),
        timeout_secs: 5,
    }
}

fn token_envelope(token: &str, refresh_token: &str) -> Value {
    json!({
        "succeeded": true,
        "messages": [],
        "data": {
            "token": token,
            "refreshToken": refresh_token,
            "refreshTokenExpiryTime": "2030-01-01T00:00:00Z"
        }
    })
}

#[tokio::test]
async fn test_login_refresh_logout() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp directory");
    let first = access_token("admin@root.com");
    let second = unsigned_token(&json!({"tenant": "root", "email": "admin@root.com"}));

    Mock::given(method("POST"))
        .and(path("/api/tokens"))
        .and(header("tenant", "root"))
        .and(body_json(json!({
            "email": "admin@root.com",
            "password": "123Pa$$word!"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_envelope(&first, "refresh-1")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/tokens/refresh"))
        .and(header("tenant", "root"))
        .and(body_json(json!({"token": first, "refreshToken": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_envelope(&second, "refresh-2")))
        .expect(1)
        .mount(&server)
        .await;

    let host = Host::from_config(&config(&server, &dir)).await.unwrap();
    assert_eq!(host.whoami().await.unwrap(), AuthenticationState::Anonymous);

    let result = host
        .login(None, "admin@root.com", "123Pa$$word!")
        .await
        .unwrap();
    assert!(result.is_success());

    let state = host.whoami().await.unwrap();
    let claims = state.claims().expect("logged in");
    assert_eq!(claims.email(), Some("admin@root.com"));
    assert_eq!(claims.full_name(), Some("Root Admin"));
    assert!(claims.has_permission("Permissions.Users.Create"));

    let refreshed = host.refresh().await.unwrap();
    assert!(refreshed.is_success());

    // A second host over the same file sees the refreshed pair.
    let reopened = Host::from_config(&config(&server, &dir)).await.unwrap();
    let state = reopened.whoami().await.unwrap();
    assert_eq!(state.tenant(), Some("root"));
    assert_eq!(state.claims().and_then(|c| c.full_name()), None);

    host.logout().await.unwrap();
    assert_eq!(host.last_route().as_deref(), Some("/login"));
    assert_eq!(host.whoami().await.unwrap(), AuthenticationState::Anonymous);
    assert!(host.refresh().await.is_err());
}

#[tokio::test]
async fn test_rejected_login_stores_nothing() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp directory");

    Mock::given(method("POST"))
        .and(path("/api/tokens"))
        .and(header("tenant", "beta"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "succeeded": false,
            "messages": ["Authentication Failed."]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let host = Host::from_config(&config(&server, &dir)).await.unwrap();
    let result = host
        .login(Some("beta"), "admin@root.com", "wrong")
        .await
        .unwrap();

    assert!(!result.is_success());
    assert_eq!(result.messages, vec!["Authentication Failed.".to_string()]);
    assert_eq!(host.whoami().await.unwrap(), AuthenticationState::Anonymous);
    assert!(!dir.path().join("session.json").exists());
    assert_eq!(host.last_route(), None);
}

#[tokio::test]
async fn test_success_without_tokens_is_invalid() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp directory");

    Mock::given(method("POST"))
        .and(path("/api/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "succeeded": true,
            "messages": [],
            "data": null
        })))
        .mount(&server)
        .await;

    let host = Host::from_config(&config(&server, &dir)).await.unwrap();
    let result = host.login(None, "admin@root.com", "x").await.unwrap();

    assert!(!result.is_success());
    assert_eq!(result.message_line(), "Invalid token received.");
    assert_eq!(host.whoami().await.unwrap(), AuthenticationState::Anonymous);
}

#[tokio::test]
async fn test_null_access_token_is_invalid() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp directory");

    Mock::given(method("POST"))
        .and(path("/api/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "succeeded": true,
            "messages": [],
            "data": {"token": null, "refreshToken": "refresh-1"}
        })))
        .mount(&server)
        .await;

    let host = Host::from_config(&config(&server, &dir)).await.unwrap();
    let result = host.login(None, "admin@root.com", "x").await.unwrap();

    assert!(!result.is_success());
    assert_eq!(result.messages, vec!["Invalid token received.".to_string()]);
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_blank_tenant_falls_back_to_configured() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp directory");

    Mock::given(method("POST"))
        .and(path("/api/tokens"))
        .and(header("tenant", "root"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_envelope(&access_token("admin@root.com"), "r")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let host = Host::from_config(&config(&server, &dir)).await.unwrap();
    let result = host.login(Some("  "), "admin@root.com", "x").await.unwrap();

    assert!(result.is_success());
    assert_eq!(host.whoami().await.unwrap().tenant(), Some("root"));
}

#[tokio::test]
async fn test_corrupt_session_file_does_not_lock_out() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp directory");
    let session_file = dir.path().join("session.json");
    std::fs::write(&session_file, r#"{"authToken": "abc", "refr"#).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/tokens"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_envelope(&access_token("admin@root.com"), "r")),
        )
        .mount(&server)
        .await;

    let host = Host::from_config(&config(&server, &dir)).await.unwrap();
    assert_eq!(host.whoami().await.unwrap(), AuthenticationState::Anonymous);

    host.logout().await.unwrap();
    assert_eq!(host.last_route().as_deref(), Some("/login"));

    let result = host.login(None, "admin@root.com", "x").await.unwrap();
    assert!(result.is_success());
    assert!(host.whoami().await.unwrap().is_authenticated());
}
