//! Material detail flows against a wiremock backend.

mod common;

use common::{material_json, page_json, user_json, TestApp};
use portal::detail::{DELETED, RATE_FAILED, RATE_OK};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn signed_in_with_material(server: &MockServer) -> TestApp {
    let t = TestApp::with_tokens(server, "acc", Some("ref"));
    Mock::given(method("GET"))
        .and(path("/v1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("viewer", "Ana")))
        .mount(server)
        .await;
    let mut material = material_json(42, "Compiladores");
    material["averageRating"] = json!(3.0);
    material["totalRatings"] = json!(1);
    Mock::given(method("GET"))
        .and(path("/v1/materials/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(material))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/materials/42/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0, 0, 10)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/author-1/follow-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"following": false})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/materials/recommended"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
    t.app.auth().bootstrap().await;
    t
}

#[tokio::test]
async fn test_rating_confirmed_by_summary() {
    let server = MockServer::start().await;
    let t = signed_in_with_material(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/materials/42/rate"))
        .and(body_json(json!({"value": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(5)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/materials/42/ratings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "averageRating": 4.5,
            "totalRatings": 2,
            "distribution": {"5": 1, "4": 1}
        })))
        .mount(&server)
        .await;

    let mut detail = t.app.detail();
    detail.load("42").await;
    assert!(detail.related().is_empty());

    detail.rate(5).await;
    let material = detail.material().unwrap();
    assert!((material.average_rating - 4.5).abs() < 1e-9);
    assert_eq!(material.total_ratings, 2);
    assert!(!material.user_rating.can_rate());
    assert!(t.app.notifier().contains(RATE_OK));
}

#[tokio::test]
async fn test_rating_failure_rolls_back() {
    let server = MockServer::start().await;
    let t = signed_in_with_material(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/materials/42/rate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut detail = t.app.detail();
    detail.load("42").await;
    detail.rate(1).await;

    let material = detail.material().unwrap();
    assert!((material.average_rating - 3.0).abs() < 1e-9);
    assert_eq!(material.total_ratings, 1);
    assert!(material.user_rating.can_rate());
    assert!(t.app.notifier().contains(RATE_FAILED));
}

#[tokio::test]
async fn test_confirmed_delete_navigates_away() {
    let server = MockServer::start().await;
    let t = signed_in_with_material(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/v1/materials/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut detail = t.app.detail();
    detail.load("42").await;
    assert!(!detail.confirm_delete().await);

    detail.request_delete();
    assert!(detail.confirm_delete().await);
    assert!(t.app.notifier().contains(DELETED));
    assert_eq!(t.navigator.routes(), vec!["/my-materials".to_string()]);
}
