//! Material endpoints.

use bytes::Bytes;
use tracing::{debug, info};

use super::client::{decode, ApiCall, ApiClient};
use crate::error::PortalResult;
use crate::models::{
    Area, Comment, DownloadLink, FileUpload, Material, MaterialDraft, MaterialType, NewComment,
    Page, RatingSummary,
};
use crate::traits::{Headers, MultipartPart};

/// Search payload for `GET /materials`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    pub types: Vec<MaterialType>,
    pub areas: Vec<Area>,
    /// Server sort key; `None` means relevance
    pub sort: Option<String>,
    /// Maximum age in years
    pub date_range: Option<u32>,
    pub min_downloads: Option<u64>,
    pub only_free: Option<bool>,
}

impl MaterialQuery {
    fn to_call(&self) -> ApiCall {
        let csv = |items: Vec<&str>| items.join(",");
        ApiCall::get("/materials")
            .query("page", self.page)
            .query("size", self.size)
            .query_opt("search", self.search.as_deref().filter(|s| !s.is_empty()))
            .query_opt(
                "type",
                Some(csv(self.types.iter().map(|t| t.as_str()).collect())).filter(|s| !s.is_empty()),
            )
            .query_opt(
                "area",
                Some(csv(self.areas.iter().map(|a| a.as_str()).collect())).filter(|s| !s.is_empty()),
            )
            .query_opt("sort", self.sort.as_deref())
            .query_opt("dateRange", self.date_range)
            .query_opt("minDownloads", self.min_downloads)
            .query_opt("onlyFree", self.only_free)
    }
}

/// `/materials/*`.
#[derive(Debug, Clone)]
pub struct MaterialsApi {
    client: ApiClient,
}

impl MaterialsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /materials with the full filter payload.
    pub async fn search(&self, query: &MaterialQuery) -> PortalResult<Page<Material>> {
        self.client.send_json(&query.to_call()).await
    }

    /// GET /materials/me
    pub async fn mine(&self, page: u32, size: u32) -> PortalResult<Page<Material>> {
        let call = ApiCall::get("/materials/me")
            .query("page", page)
            .query("size", size);
        self.client.send_json(&call).await
    }

    pub async fn recommended(&self, page: u32, size: u32) -> PortalResult<Page<Material>> {
        let call = ApiCall::get("/materials/recommended")
            .query("page", page)
            .query("size", size);
        self.client.send_json(&call).await
    }

    pub async fn trending(&self, page: u32, size: u32) -> PortalResult<Page<Material>> {
        let call = ApiCall::get("/materials/trending")
            .query("page", page)
            .query("size", size);
        self.client.send_json(&call).await
    }

    /// Newest first.
    pub async fn recent(&self, page: u32, size: u32) -> PortalResult<Page<Material>> {
        let call = ApiCall::get("/materials")
            .query("page", page)
            .query("size", size)
            .query("sort", "createdAt,desc");
        self.client.send_json(&call).await
    }

    /// GET /materials/trending-topics
    pub async fn trending_topics(&self) -> PortalResult<Vec<String>> {
        self.client
            .send_json(&ApiCall::get("/materials/trending-topics"))
            .await
    }

    pub async fn get(&self, id: &str) -> PortalResult<Material> {
        self.client
            .send_json(&ApiCall::get(format!("/materials/{}", id)))
            .await
    }

    pub async fn delete(&self, id: &str) -> PortalResult<()> {
        self.client
            .send(&ApiCall::delete(format!("/materials/{}", id)))
            .await?;
        info!(material_id = %id, "Material deleted");
        Ok(())
    }

    /// POST /materials as multipart: a `materialRequestDTO` JSON part and a
    /// `file` part.
    pub async fn upload(&self, draft: &MaterialDraft, file: &FileUpload) -> PortalResult<Material> {
        let parts = vec![
            MultipartPart::Json {
                name: "materialRequestDTO".to_string(),
                value: serde_json::to_string(draft)?,
            },
            file.to_part("file"),
        ];
        debug!(title = %draft.title, file = %file.file_name, bytes = file.size(), "Uploading material");
        self.client
            .send_json(&ApiCall::post("/materials").multipart(parts))
            .await
    }

    /// Fetch the material file. The endpoint either streams the file itself
    /// or answers with a JSON link that is then fetched without credentials.
    pub async fn download(&self, id: &str) -> PortalResult<(DownloadLink, Bytes)> {
        let call = ApiCall::get(format!("/materials/{}/download", id));
        let response = self.client.send(&call).await?;

        let is_json = response
            .headers
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case("content-type") && v.contains("json"));
        if is_json {
            if let Ok(link) = decode::<DownloadLink>(&response) {
                let file = self.client.fetch_absolute(&link.url).await?;
                return Ok((link, file.body));
            }
        }

        let link = DownloadLink {
            url: self.client.url_for(&call),
            file_name: attachment_name(&response.headers)
                .unwrap_or_else(|| format!("material-{}", id)),
        };
        Ok((link, response.body))
    }

    /// POST /materials/{id}/like. Returns whether the material is now liked.
    pub async fn toggle_like(&self, id: &str) -> PortalResult<bool> {
        self.client
            .send_flag(&ApiCall::post(format!("/materials/{}/like", id)), "liked")
            .await
    }

    /// POST /materials/{id}/save. Returns whether the material is now saved.
    pub async fn toggle_save(&self, id: &str) -> PortalResult<bool> {
        self.client
            .send_flag(&ApiCall::post(format!("/materials/{}/save", id)), "saved")
            .await
    }

    /// POST /materials/{id}/rate. Returns the stored star value when the
    /// server echoes it.
    pub async fn rate(&self, id: &str, value: u8) -> PortalResult<Option<u8>> {
        let call = ApiCall::post(format!("/materials/{}/rate", id))
            .json(&serde_json::json!({ "value": value }))?;
        let response = self.client.send(&call).await?;
        if response.body.is_empty() {
            return Ok(None);
        }
        let echoed: serde_json::Value = decode(&response)?;
        let stars = echoed
            .as_u64()
            .or_else(|| echoed.get("value").and_then(|v| v.as_u64()))
            .and_then(|v| u8::try_from(v).ok());
        Ok(stars)
    }

    /// GET /materials/{id}/ratings
    pub async fn ratings(&self, id: &str) -> PortalResult<RatingSummary> {
        self.client
            .send_json(&ApiCall::get(format!("/materials/{}/ratings", id)))
            .await
    }

    pub async fn comments(&self, id: &str, page: u32, size: u32) -> PortalResult<Page<Comment>> {
        let call = ApiCall::get(format!("/materials/{}/comments", id))
            .query("page", page)
            .query("size", size);
        self.client.send_json(&call).await
    }

    pub async fn add_comment(&self, id: &str, content: &str) -> PortalResult<Comment> {
        let call = ApiCall::post(format!("/materials/{}/comments", id)).json(&NewComment {
            content: content.to_string(),
        })?;
        self.client.send_json(&call).await
    }

    /// POST /materials/{id}/comments/{comment_id}/like
    pub async fn toggle_comment_like(&self, id: &str, comment_id: &str) -> PortalResult<bool> {
        let call = ApiCall::post(format!("/materials/{}/comments/{}/like", id, comment_id));
        self.client.send_flag(&call, "liked").await
    }
}

/// File name from a `Content-Disposition: attachment; filename="..."` header.
fn attachment_name(headers: &Headers) -> Option<String> {
    let value = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-disposition"))
        .map(|(_, v)| v)?;
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
