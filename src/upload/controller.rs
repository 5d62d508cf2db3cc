//! Upload submission.

use tracing::{info, warn};

use super::form::UploadForm;
use crate::api::{ApiClient, MaterialsApi};
use crate::error::{NetworkError, PortalError};
use crate::models::Material;

pub const UPLOAD_FAILED: &str = "Erro ao enviar o material. Tente novamente.";

#[derive(Debug)]
pub struct UploadController {
    client: ApiClient,
    api: MaterialsApi,
    form: UploadForm,
    error: Option<String>,
    is_uploading: bool,
}

impl UploadController {
    pub fn new(client: ApiClient) -> Self {
        Self {
            api: MaterialsApi::new(client.clone()),
            client,
            form: UploadForm::default(),
            error: None,
            is_uploading: false,
        }
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UploadForm {
        &mut self.form
    }

    /// Inline error shown above the form.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    pub fn select_file(&mut self, file: crate::models::FileUpload) -> bool {
        match self.form.select_file(file) {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Validate and upload. On success navigates to the new material.
    /// Validation failures never reach the network.
    pub async fn submit(&mut self) -> Option<Material> {
        self.error = None;
        let (draft, file) = match self.form.validate() {
            Ok(parts) => parts,
            Err(err) => {
                self.error = Some(err.to_string());
                return None;
            }
        };

        self.is_uploading = true;
        let result = self.api.upload(&draft, &file).await;
        self.is_uploading = false;

        match result {
            Ok(material) => {
                info!(material_id = %material.id, title = %material.title, "Material uploaded");
                let route = self.client.config().route(&format!("/material/{}", material.id));
                self.client.navigator().navigate(&route);
                self.form = UploadForm::default();
                Some(material)
            }
            Err(err) => {
                warn!(error = %err, "Upload failed");
                self.error = Some(upload_error_message(&err));
                None
            }
        }
    }
}

fn upload_error_message(err: &PortalError) -> String {
    match err {
        PortalError::Network(NetworkError::HttpStatus { message, .. }) if !message.trim().is_empty() => {
            message.clone()
        }
        _ => UPLOAD_FAILED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryStorage, MockHttpClient, RecordingNavigator};
    use crate::auth::SessionStore;
    use crate::config::ClientConfig;
    use crate::models::{Area, FileUpload, MaterialType};
    use crate::traits::{Method, RequestBody, TOKEN_KEY};
    use bytes::Bytes;
    use serde_json::json;
    use std::sync::Arc;

    fn controller() -> (UploadController, MockHttpClient, RecordingNavigator) {
        let http = MockHttpClient::new();
        let navigator = RecordingNavigator::new();
        let client = ApiClient::new(
            Arc::new(ClientConfig::default().with_api_url("http://api.test")),
            Arc::new(http.clone()),
            SessionStore::new(Arc::new(InMemoryStorage::with_values([(TOKEN_KEY, "acc")]))),
            Arc::new(navigator.clone()),
        );
        (UploadController::new(client), http, navigator)
    }

    fn fill(form: &mut UploadForm) {
        form.title = "Lista 3".to_string();
        form.material_type = Some(MaterialType::Exercise);
        form.area = Some(Area::ComputerScience);
        form.accept_terms = true;
    }

    #[tokio::test]
    async fn test_missing_file_never_hits_network() {
        let (mut upload, http, _) = controller();
        fill(upload.form_mut());

        assert!(upload.submit().await.is_none());
        assert_eq!(upload.error(), Some("Selecione um arquivo para upload."));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_successful_upload_navigates() {
        let (mut upload, http, navigator) = controller();
        fill(upload.form_mut());
        assert!(upload.select_file(FileUpload::new(
            "lista3.pdf",
            "application/pdf",
            Bytes::from_static(b"%PDF")
        )));
        http.push_json(
            Method::Post,
            "http://api.test/v1/materials",
            201,
            &json!({"id": 77, "title": "Lista 3"}),
        );

        let material = upload.submit().await.unwrap();
        assert_eq!(material.id, "77");
        assert_eq!(navigator.routes(), vec!["/material/77".to_string()]);

        let sent = &http.requests()[0];
        match &sent.body {
            RequestBody::Multipart(parts) => {
                let names: Vec<_> = parts.iter().map(|p| p.name()).collect();
                assert_eq!(names, vec!["materialRequestDTO", "file"]);
            }
            other => panic!("expected multipart, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_message_is_shown() {
        let (mut upload, http, _) = controller();
        fill(upload.form_mut());
        upload.select_file(FileUpload::new("a.pdf", "application/pdf", Bytes::from_static(b"x")));
        http.push_json(
            Method::Post,
            "http://api.test/v1/materials",
            400,
            &json!({"message": "Título já utilizado"}),
        );

        assert!(upload.submit().await.is_none());
        assert_eq!(upload.error(), Some("Título já utilizado"));
    }
}
