//! Authentication endpoints.

use tracing::{debug, info};

use super::client::{ApiCall, ApiClient};
use crate::error::{AuthError, PortalError, PortalResult};
use crate::models::{FileUpload, LoginCredentials, RegisterData, TokenResponse, User};
use crate::traits::MultipartPart;

/// `/auth/*` plus the current-user lookup.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// POST /auth/login
    pub async fn login(&self, credentials: &LoginCredentials) -> PortalResult<TokenResponse> {
        debug!(email = %credentials.email, "Logging in");
        let call = ApiCall::post("/auth/login").json(credentials)?.public();
        self.client
            .send_json(&call)
            .await
            .map_err(rejected_credentials)
    }

    /// POST /auth/register with a JSON body.
    pub async fn register(&self, data: &RegisterData) -> PortalResult<TokenResponse> {
        debug!(email = %data.email, "Registering");
        let call = ApiCall::post("/auth/register").json(data)?.public();
        self.client.send_json(&call).await
    }

    /// POST /auth/register as multipart with a profile picture.
    pub async fn register_with_picture(
        &self,
        data: &RegisterData,
        picture: &FileUpload,
    ) -> PortalResult<TokenResponse> {
        debug!(email = %data.email, file = %picture.file_name, "Registering with picture");
        let parts = vec![
            MultipartPart::Text {
                name: "name".to_string(),
                value: data.name.clone(),
            },
            MultipartPart::Text {
                name: "email".to_string(),
                value: data.email.clone(),
            },
            MultipartPart::Text {
                name: "password".to_string(),
                value: data.password.clone(),
            },
            picture.to_part("profilePicture"),
        ];
        let call = ApiCall::post("/auth/register").multipart(parts).public();
        self.client.send_json(&call).await
    }

    /// POST /auth/logout
    pub async fn logout(&self, refresh_token: &str) -> PortalResult<()> {
        let call = ApiCall::post("/auth/logout")
            .json(&serde_json::json!({ "refreshToken": refresh_token }))?
            .public();
        self.client.send(&call).await?;
        info!("Server session revoked");
        Ok(())
    }

    /// GET /users/me
    pub async fn current_user(&self) -> PortalResult<User> {
        self.client.send_json(&ApiCall::get("/users/me")).await
    }
}

/// Login answers 401/403 for bad credentials, not for an expired session.
fn rejected_credentials(err: PortalError) -> PortalError {
    match err {
        PortalError::Auth(AuthError::Unauthorized { message })
        | PortalError::Auth(AuthError::AccessDenied { message }) => {
            AuthError::InvalidCredentials { message }.into()
        }
        other => other,
    }
}
