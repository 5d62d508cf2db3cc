//! Upload form submission against a wiremock backend.

mod common;

use bytes::Bytes;
use common::TestApp;
use portal::models::{Area, FileUpload, MaterialType};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fill(upload: &mut portal::upload::UploadController) {
    let form = upload.form_mut();
    form.title = "Lista de Exercícios 2".to_string();
    form.material_type = Some(MaterialType::Exercise);
    form.area = Some(Area::ComputerScience);
    form.keywords = "grafos, árvores".to_string();
    form.accept_terms = true;
}

#[tokio::test]
async fn test_submit_without_file_issues_no_request() {
    let server = MockServer::start().await;
    let t = TestApp::with_tokens(&server, "acc", Some("ref"));

    let mut upload = t.app.upload();
    fill(&mut upload);
    assert!(upload.submit().await.is_none());

    assert_eq!(upload.error(), Some("Selecione um arquivo para upload."));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_multipart_upload_and_redirect() {
    let server = MockServer::start().await;
    let t = TestApp::with_tokens(&server, "acc", Some("ref"));

    Mock::given(method("POST"))
        .and(path("/v1/materials"))
        .and(header("Authorization", "Bearer acc"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 314,
            "title": "Lista de Exercícios 2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut upload = t.app.upload();
    fill(&mut upload);
    assert!(upload.select_file(FileUpload::new(
        "lista2.pdf",
        "application/pdf",
        Bytes::from_static(b"%PDF-1.4 test")
    )));

    let material = upload.submit().await.unwrap();
    assert_eq!(material.id, "314");
    assert_eq!(t.navigator.routes(), vec!["/material/314".to_string()]);

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"materialRequestDTO\""));
    assert!(body.contains("\"keywords\":[\"grafos\",\"árvores\"]"));
    assert!(body.contains("name=\"file\"; filename=\"lista2.pdf\""));
}

#[tokio::test]
async fn test_rejected_file_type_keeps_form_local() {
    let server = MockServer::start().await;
    let t = TestApp::new(&server);

    let mut upload = t.app.upload();
    assert!(!upload.select_file(FileUpload::new(
        "foto.png",
        "image/png",
        Bytes::from_static(b"png")
    )));
    assert!(upload.error().unwrap().starts_with("Tipo de arquivo não suportado"));
    assert!(upload.form().file.is_none());
}
