//! Integration tests for the refresh-once policy of the API client, run
//! against a wiremock server through the production reqwest transport.

mod common;

use common::{page_json, TestApp};
use portal::error::{AuthError, PortalError};
use portal::traits::{REFRESH_TOKEN_KEY, TOKEN_KEY};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_401_refreshes_once_and_retries() {
    let server = MockServer::start().await;
    let t = TestApp::with_tokens(&server, "old-access", Some("refresh-1"));

    Mock::given(method("GET"))
        .and(path("/v1/materials/me"))
        .and(header("Authorization", "Bearer old-access"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh-token"))
        .and(body_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "new-access",
            "refreshToken": "refresh-2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/materials/me"))
        .and(header("Authorization", "Bearer new-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0, 0, 10)))
        .expect(1)
        .mount(&server)
        .await;

    let page = t.app.materials().mine(0, 10).await.unwrap();
    assert!(page.content.is_empty());
    assert_eq!(t.stored(TOKEN_KEY).as_deref(), Some("new-access"));
    assert_eq!(t.stored(REFRESH_TOKEN_KEY).as_deref(), Some("refresh-2"));
    assert!(t.navigator.routes().is_empty());
}

#[tokio::test]
async fn test_refresh_failure_clears_session_and_redirects() {
    let server = MockServer::start().await;
    let t = TestApp::with_tokens(&server, "old-access", Some("revoked"));

    Mock::given(method("GET"))
        .and(path("/v1/users/me/saved-materials"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid refresh token"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = t.app.users().saved_materials(0, 10).await.unwrap_err();
    assert!(matches!(err, PortalError::Auth(AuthError::RefreshFailed { .. })));
    assert!(err.requires_reauth());
    assert_eq!(t.stored(TOKEN_KEY), None);
    assert_eq!(t.stored(REFRESH_TOKEN_KEY), None);
    assert_eq!(t.navigator.routes(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_second_401_is_not_retried_again() {
    let server = MockServer::start().await;
    let t = TestApp::with_tokens(&server, "old-access", Some("refresh-1"));

    Mock::given(method("GET"))
        .and(path("/v1/materials/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "new-access"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = t.app.materials().mine(0, 10).await.unwrap_err();
    assert!(matches!(err, PortalError::Auth(AuthError::SessionExpired)));
    assert_eq!(t.stored(TOKEN_KEY), None);
    assert_eq!(t.navigator.routes(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_missing_refresh_token_skips_refresh_call() {
    let server = MockServer::start().await;
    let t = TestApp::with_tokens(&server, "old-access", None);

    Mock::given(method("GET"))
        .and(path("/v1/materials/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = t.app.materials().mine(0, 10).await.unwrap_err();
    assert!(matches!(err, PortalError::Auth(AuthError::NoRefreshToken)));
    assert_eq!(t.navigator.routes(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_server_message_surfaces_on_other_errors() {
    let server = MockServer::start().await;
    let t = TestApp::with_tokens(&server, "acc", Some("ref"));

    Mock::given(method("GET"))
        .and(path("/v1/materials/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Material não encontrado"})))
        .mount(&server)
        .await;

    let err = t.app.materials().get("99").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Material não encontrado");
    assert_eq!(t.stored(TOKEN_KEY).as_deref(), Some("acc"));
}
