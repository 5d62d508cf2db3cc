//! User and profile endpoints.

use tracing::debug;

use super::client::{ApiCall, ApiClient};
use crate::error::PortalResult;
use crate::models::{
    FileUpload, Material, Page, PasswordChange, ProfileUpdate, UserProfile, UserStats,
};
use crate::traits::MultipartPart;

/// `/users/*`.
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /users/me
    pub async fn me(&self) -> PortalResult<UserProfile> {
        self.client.send_json(&ApiCall::get("/users/me")).await
    }

    /// GET /users/{id}
    pub async fn profile(&self, user_id: &str) -> PortalResult<UserProfile> {
        self.client
            .send_json(&ApiCall::get(format!("/users/{}", user_id)))
            .await
    }

    /// PUT /users/me
    pub async fn update_me(&self, update: &ProfileUpdate) -> PortalResult<UserProfile> {
        let call = ApiCall::put("/users/me").json(update)?;
        self.client.send_json(&call).await
    }

    /// PUT /users/me as multipart: a `user` JSON part and a
    /// `profilePicture` part.
    pub async fn update_me_with_picture(
        &self,
        update: &ProfileUpdate,
        picture: &FileUpload,
    ) -> PortalResult<UserProfile> {
        let parts = vec![
            MultipartPart::Json {
                name: "user".to_string(),
                value: serde_json::to_string(update)?,
            },
            picture.to_part("profilePicture"),
        ];
        self.client
            .send_json(&ApiCall::put("/users/me").multipart(parts))
            .await
    }

    /// POST /users/change-password
    pub async fn change_password(&self, change: &PasswordChange) -> PortalResult<()> {
        let call = ApiCall::post("/users/change-password").json(change)?;
        self.client.send(&call).await?;
        debug!("Password changed");
        Ok(())
    }

    /// PUT /users/me/cover-image
    pub async fn update_cover_image(&self, image: &FileUpload) -> PortalResult<UserProfile> {
        let call = ApiCall::put("/users/me/cover-image").multipart(vec![image.to_part("coverImage")]);
        self.client.send_json(&call).await
    }

    pub async fn followers(&self, user_id: &str) -> PortalResult<Vec<UserProfile>> {
        self.client
            .send_json(&ApiCall::get(format!("/users/{}/followers", user_id)))
            .await
    }

    /// POST /users/{id}/follow. Returns whether the viewer now follows.
    pub async fn toggle_follow(&self, user_id: &str) -> PortalResult<bool> {
        self.client
            .send_flag(&ApiCall::post(format!("/users/{}/follow", user_id)), "following")
            .await
    }

    /// GET /users/{id}/follow-status
    pub async fn follow_status(&self, user_id: &str) -> PortalResult<bool> {
        self.client
            .send_flag(
                &ApiCall::get(format!("/users/{}/follow-status", user_id)),
                "following",
            )
            .await
    }

    /// Uploads of a user, newest first.
    pub async fn materials(&self, user_id: &str, page: u32, size: u32) -> PortalResult<Page<Material>> {
        let call = ApiCall::get(format!("/users/{}/materials", user_id))
            .query("page", page)
            .query("size", size)
            .query("sort", "createdAt,desc");
        self.client.send_json(&call).await
    }

    /// Materials the viewer saved, most recently saved first.
    pub async fn saved_materials(&self, page: u32, size: u32) -> PortalResult<Page<Material>> {
        let call = ApiCall::get("/users/me/saved-materials")
            .query("page", page)
            .query("size", size)
            .query("sort", "savedAt,desc");
        self.client.send_json(&call).await
    }

    pub async fn stats(&self, user_id: &str) -> PortalResult<UserStats> {
        self.client
            .send_json(&ApiCall::get(format!("/users/{}/stats", user_id)))
            .await
    }
}
