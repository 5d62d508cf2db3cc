//! End-to-end auth flows: login, bootstrap from a stored session, logout.

mod common;

use common::{page_json, user_json, TestApp};
use portal::auth::LoginForm;
use portal::models::AuthOutcome;
use portal::traits::{REFRESH_TOKEN_KEY, TOKEN_KEY, USER_KEY};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_then_authenticated_request_carries_bearer() {
    let server = MockServer::start().await;
    let t = TestApp::new(&server);

    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .and(body_json(json!({"email": "ana@uni.br", "password": "segredo"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "acc-1",
            "refreshToken": "ref-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/me"))
        .and(header("Authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u-1", "Ana")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/materials/me"))
        .and(header("Authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0, 0, 10)))
        .expect(1)
        .mount(&server)
        .await;

    let mut rx = t.app.auth().subscribe();
    let outcome = t.app.auth().login_form(&LoginForm::new("ana@uni.br", "segredo")).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.data().unwrap().name, "Ana");

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert!(state.is_authenticated);
    assert!(!state.is_loading);

    assert_eq!(t.stored(TOKEN_KEY).as_deref(), Some("acc-1"));
    assert_eq!(t.stored(REFRESH_TOKEN_KEY).as_deref(), Some("ref-1"));
    assert!(t.stored(USER_KEY).unwrap().contains("\"Ana\""));

    t.app.materials().mine(0, 10).await.unwrap();
}

#[tokio::test]
async fn test_login_rejected_does_not_refresh() {
    let server = MockServer::start().await;
    let t = TestApp::new(&server);

    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = t.app.auth().login_form(&LoginForm::new("ana@uni.br", "errada")).await;
    assert_eq!(
        outcome,
        AuthOutcome::Failure("E-mail ou senha inválidos.".to_string())
    );
    assert!(!t.app.auth().is_authenticated());
    assert!(t.navigator.routes().is_empty());
}

#[tokio::test]
async fn test_empty_login_form_never_hits_network() {
    let server = MockServer::start().await;
    let t = TestApp::new(&server);

    let outcome = t.app.auth().login_form(&LoginForm::new("", "x")).await;
    assert_eq!(outcome.error(), Some("Informe seu e-mail."));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bootstrap_restores_stored_session() {
    let server = MockServer::start().await;
    let t = TestApp::with_tokens(&server, "acc", Some("ref"));

    Mock::given(method("GET"))
        .and(path("/v1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u-7", "Caio")))
        .mount(&server)
        .await;

    assert!(t.app.auth().state().is_loading);
    t.app.auth().bootstrap().await;
    let state = t.app.auth().state();
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.user.unwrap().id, "u-7");
}

#[tokio::test]
async fn test_bootstrap_with_dead_session_signs_out() {
    let server = MockServer::start().await;
    let t = TestApp::with_tokens(&server, "acc", Some("ref"));

    Mock::given(method("GET"))
        .and(path("/v1/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    t.app.auth().bootstrap().await;
    assert!(!t.app.auth().is_authenticated());
    assert_eq!(t.stored(TOKEN_KEY), None);
}

#[tokio::test]
async fn test_logout_clears_session_even_if_server_fails() {
    let server = MockServer::start().await;
    let t = TestApp::with_tokens(&server, "acc", Some("ref"));

    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    t.app.auth().logout().await;
    assert!(!t.app.auth().is_authenticated());
    assert_eq!(t.stored(TOKEN_KEY), None);
    assert_eq!(t.stored(REFRESH_TOKEN_KEY), None);
}
