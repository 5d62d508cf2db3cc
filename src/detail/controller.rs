//! Material detail controller.
//!
//! Per-material state: likes, comments, rating, save, follow-author and
//! delete. User actions never return errors; outcomes are reported through
//! the [`Notifier`] and failed initial loads through [`DetailController::error`].

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, MaterialsApi, UsersApi};
use crate::auth::AuthController;
use crate::debounce::SubmissionGate;
use crate::error::{PortalResult, ValidationError};
use crate::models::{Comment, DownloadLink, Material, PaginationInfo, UserRating};
use crate::notifications::Notifier;
use crate::optimistic::OptimisticUpdate;

/// Comments per page.
pub const COMMENTS_PAGE_SIZE: u32 = 10;
/// Related materials shown next to the detail view.
pub const RELATED_COUNT: usize = 3;

pub const LOAD_FAILED: &str = "Não foi possível carregar os detalhes deste recurso.";

mod msg {
    pub const LIKE_LOGIN: &str = "Faça login para curtir este recurso";
    pub const LIKE_FAILED: &str = "Não foi possível curtir este recurso.";
    pub const COMMENT_OK: &str = "Comentário publicado com sucesso!";
    pub const COMMENT_FAILED: &str = "Não foi possível publicar seu comentário.";
    pub const COMMENT_LIKE_LOGIN: &str = "Faça login para curtir comentários";
    pub const COMMENT_LIKE_FAILED: &str = "Não foi possível curtir este comentário.";
    pub const DOWNLOAD_OK: &str = "Download iniciado com sucesso!";
    pub const DOWNLOAD_FAILED: &str = "Não foi possível baixar este recurso.";
    pub const SAVE_LOGIN: &str = "Faça login para salvar este recurso";
    pub const SAVED: &str = "Recurso salvo com sucesso!";
    pub const UNSAVED: &str = "Recurso removido dos salvos";
    pub const SAVE_FAILED: &str = "Não foi possível salvar este recurso.";
    pub const FOLLOW_LOGIN: &str = "Faça login para seguir este autor";
    pub const FOLLOWING: &str = "Agora você segue este autor";
    pub const UNFOLLOWED: &str = "Você deixou de seguir este autor";
    pub const FOLLOW_FAILED: &str = "Não foi possível seguir este autor.";
    pub const DELETED: &str = "Material excluído com sucesso!";
    pub const DELETE_FAILED: &str = "Não foi possível excluir este material.";
    pub const RATE_LOGIN: &str = "Faça login para avaliar este material";
    pub const ALREADY_RATED: &str = "Você já avaliou este material";
    pub const RATE_OK: &str = "Avaliação enviada com sucesso!";
    pub const RATE_FAILED: &str = "Falha ao enviar avaliação";
}

pub use msg::*;

/// Average after adding one `stars` rating to `count` existing ones.
pub fn estimated_average(average: f64, count: i64, stars: u8) -> f64 {
    let count = count.max(0) as f64;
    (average * count + f64::from(stars)) / (count + 1.0)
}

/// A rating shown before the server confirmed it.
#[derive(Debug)]
pub struct RatingTicket {
    material_id: String,
    stars: u8,
    update: OptimisticUpdate<Material>,
}

impl RatingTicket {
    pub fn stars(&self) -> u8 {
        self.stars
    }

    pub async fn run(&self, api: &MaterialsApi) -> PortalResult<Option<u8>> {
        api.rate(&self.material_id, self.stars).await
    }
}

pub struct DetailController {
    client: ApiClient,
    materials: MaterialsApi,
    users: UsersApi,
    auth: AuthController,
    notifier: Notifier,
    gate: SubmissionGate,

    material_id: String,
    material: Option<Material>,
    is_loading: bool,
    error: Option<String>,
    is_author: bool,
    following_author: bool,
    related: Vec<Material>,

    comments: Vec<Comment>,
    comments_page: PaginationInfo,
    is_loading_comments: bool,
    comment_error: Option<String>,

    delete_requested: bool,
}

impl std::fmt::Debug for DetailController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailController")
            .field("material_id", &self.material_id)
            .field("loaded", &self.material.is_some())
            .finish()
    }
}

impl DetailController {
    pub fn new(client: ApiClient, auth: AuthController, notifier: Notifier) -> Self {
        let gate = SubmissionGate::new(client.config().like_debounce);
        Self {
            materials: MaterialsApi::new(client.clone()),
            users: UsersApi::new(client.clone()),
            client,
            auth,
            notifier,
            gate,
            material_id: String::new(),
            material: None,
            is_loading: false,
            error: None,
            is_author: false,
            following_author: false,
            related: Vec::new(),
            comments: Vec::new(),
            comments_page: PaginationInfo::default(),
            is_loading_comments: false,
            comment_error: None,
            delete_requested: false,
        }
    }

    pub fn api(&self) -> &MaterialsApi {
        &self.materials
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Full-page error from the initial load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_author(&self) -> bool {
        self.is_author
    }

    pub fn following_author(&self) -> bool {
        self.following_author
    }

    pub fn related(&self) -> &[Material] {
        &self.related
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comments_page(&self) -> PaginationInfo {
        self.comments_page
    }

    pub fn is_loading_comments(&self) -> bool {
        self.is_loading_comments
    }

    /// Inline error under the comment box.
    pub fn comment_error(&self) -> Option<&str> {
        self.comment_error.as_deref()
    }

    pub fn delete_requested(&self) -> bool {
        self.delete_requested
    }

    /// Load a material with its first comment page, the follow status of its
    /// author and a few related materials. Only the material itself is
    /// required; the rest degrades silently.
    pub async fn load(&mut self, material_id: &str) {
        self.material_id = material_id.to_string();
        self.is_loading = true;
        self.error = None;
        self.delete_requested = false;

        let material = match self.materials.get(material_id).await {
            Ok(material) => material,
            Err(err) => {
                warn!(material_id, error = %err, "Failed to load material");
                self.material = None;
                self.error = Some(LOAD_FAILED.to_string());
                self.is_loading = false;
                return;
            }
        };

        let viewer_id = self.auth.user().map(|u| u.id);
        self.is_author = match (&viewer_id, &material.author_id) {
            (Some(viewer), Some(author)) => viewer == author,
            _ => false,
        };
        let author_id = material.author_id.clone();
        self.material = Some(material);

        self.load_comments(0).await;

        self.following_author = false;
        if self.auth.is_authenticated() && !self.is_author {
            if let Some(author_id) = author_id {
                match self.users.follow_status(&author_id).await {
                    Ok(following) => self.following_author = following,
                    Err(err) => debug!(error = %err, "Follow status unavailable"),
                }
            }
        }

        match self.materials.recommended(0, RELATED_COUNT as u32).await {
            Ok(page) => {
                self.related = page.content.into_iter().take(RELATED_COUNT).collect();
            }
            Err(err) => {
                debug!(error = %err, "Related materials unavailable");
                self.related.clear();
            }
        }

        self.is_loading = false;
        info!(material_id, is_author = self.is_author, "Material loaded");
    }

    /// Load one page of comments.
    pub async fn load_comments(&mut self, page: u32) {
        self.is_loading_comments = true;
        match self
            .materials
            .comments(&self.material_id, page, COMMENTS_PAGE_SIZE)
            .await
        {
            Ok(result) => {
                self.comments_page = PaginationInfo::from_page(&result);
                self.comments = result.content;
            }
            Err(err) => warn!(material_id = %self.material_id, page, error = %err, "Failed to load comments"),
        }
        self.is_loading_comments = false;
    }

    /// Toggle the viewer's like. The server's answer decides the new state.
    pub async fn toggle_like(&mut self) {
        if !self.auth.is_authenticated() {
            self.notifier.info(LIKE_LOGIN);
            return;
        }
        let like_key = format!("like:{}", self.material_id);
        if self.material.is_none() || !self.gate.try_pass(&like_key) {
            return;
        }

        match self.materials.toggle_like(&self.material_id).await {
            Ok(liked) => {
                if let Some(material) = self.material.as_mut() {
                    material.liked = liked;
                    material.like_count = if liked {
                        material.like_count + 1
                    } else {
                        (material.like_count - 1).max(0)
                    };
                    debug!(material_id = %material.id, liked, likes = material.like_count, "Like toggled");
                }
            }
            Err(err) => {
                warn!(error = %err, "Like failed");
                self.notifier.error(LIKE_FAILED);
            }
        }
    }

    /// Post a comment, then reload the first page for server ordering.
    pub async fn add_comment(&mut self, content: &str) -> bool {
        let content = content.trim();
        if content.is_empty() {
            self.comment_error = Some(ValidationError::EmptyComment.to_string());
            return false;
        }
        self.comment_error = None;

        match self.materials.add_comment(&self.material_id, content).await {
            Ok(comment) => {
                self.comments.push(comment);
                if let Some(material) = self.material.as_mut() {
                    material.comment_count += 1;
                }
                self.notifier.success(COMMENT_OK);
                self.load_comments(0).await;
                true
            }
            Err(err) => {
                warn!(error = %err, "Comment failed");
                self.notifier.error(COMMENT_FAILED);
                false
            }
        }
    }

    pub async fn toggle_comment_like(&mut self, comment_id: &str) {
        if !self.auth.is_authenticated() {
            self.notifier.info(COMMENT_LIKE_LOGIN);
            return;
        }
        if !self.gate.try_pass(&format!("comment-like:{}", comment_id)) {
            return;
        }

        match self
            .materials
            .toggle_comment_like(&self.material_id, comment_id)
            .await
        {
            Ok(liked) => {
                if let Some(comment) = self.comments.iter_mut().find(|c| c.id == comment_id) {
                    comment.likes = if liked {
                        comment.likes + 1
                    } else {
                        (comment.likes - 1).max(0)
                    };
                }
            }
            Err(err) => {
                warn!(comment_id, error = %err, "Comment like failed");
                self.notifier.error(COMMENT_LIKE_FAILED);
            }
        }
    }

    /// Rate the material once.
    ///
    /// The estimated average is shown immediately. A confirmed rating is
    /// followed by a ratings-summary fetch for the authoritative numbers; a
    /// failed one restores the previous average and count.
    pub async fn rate(&mut self, stars: u8) {
        if let Some(ticket) = self.begin_rate(stars) {
            let result = ticket.run(&self.materials).await;
            self.finish_rate(ticket, result).await;
        }
    }

    /// Show `stars` as the viewer's rating with an estimated average and
    /// return the ticket to submit. `None` when the viewer may not rate.
    pub fn begin_rate(&mut self, stars: u8) -> Option<RatingTicket> {
        if !self.auth.is_authenticated() {
            self.notifier.info(RATE_LOGIN);
            return None;
        }
        if !(1..=5).contains(&stars) {
            self.notifier.error(ValidationError::RatingOutOfRange.to_string());
            return None;
        }
        let material = self.material.as_mut()?;
        if !material.user_rating.can_rate() {
            self.notifier.info(ALREADY_RATED);
            return None;
        }

        let update = OptimisticUpdate::apply(material, |m| {
            m.average_rating = estimated_average(m.average_rating, m.total_ratings, stars);
            m.total_ratings += 1;
            m.user_rating = UserRating::Rated(stars);
        });
        debug!(material_id = %material.id, stars, "Rating shown before confirmation");
        Some(RatingTicket {
            material_id: material.id.clone(),
            stars,
            update,
        })
    }

    /// Settle a rating. A ticket for a material that is no longer shown is
    /// dropped.
    pub async fn finish_rate(&mut self, ticket: RatingTicket, result: PortalResult<Option<u8>>) {
        let RatingTicket {
            material_id,
            stars,
            update,
        } = ticket;
        let Some(material) = self.material.as_mut().filter(|m| m.id == material_id) else {
            debug!(material_id = %material_id, "Discarding rating for a material no longer shown");
            update.commit();
            return;
        };

        match result {
            Ok(echoed) => {
                update.commit();
                material.user_rating = UserRating::Rated(echoed.unwrap_or(stars));
                self.notifier.success(RATE_OK);
                info!(material_id = %material_id, stars, "Rating submitted");
                self.reconcile_rating().await;
            }
            Err(err) => {
                update.rollback(material);
                warn!(material_id = %material_id, error = %err, "Rating failed, rolled back");
                self.notifier.error(RATE_FAILED);
            }
        }
    }

    /// Replace the estimate with the server's summary. Keeps the estimate
    /// if the summary cannot be fetched.
    async fn reconcile_rating(&mut self) {
        let summary = match self.materials.ratings(&self.material_id).await {
            Ok(summary) => summary,
            Err(err) => {
                debug!(error = %err, "Rating summary unavailable, keeping estimate");
                return;
            }
        };
        if let Some(material) = self.material.as_mut() {
            material.average_rating = summary.average_rating;
            material.total_ratings = summary.total_ratings;
            if let Some(stars) = summary.user_rating {
                material.user_rating = UserRating::Rated(stars);
            }
        }
    }

    pub async fn toggle_save(&mut self) {
        if !self.auth.is_authenticated() {
            self.notifier.info(SAVE_LOGIN);
            return;
        }
        if self.material.is_none() {
            return;
        }
        match self.materials.toggle_save(&self.material_id).await {
            Ok(saved) => {
                if let Some(material) = self.material.as_mut() {
                    material.saved = saved;
                }
                self.notifier.success(if saved { SAVED } else { UNSAVED });
            }
            Err(err) => {
                warn!(error = %err, "Save failed");
                self.notifier.error(SAVE_FAILED);
            }
        }
    }

    pub async fn toggle_follow_author(&mut self) {
        if !self.auth.is_authenticated() {
            self.notifier.info(FOLLOW_LOGIN);
            return;
        }
        let Some(author_id) = self.material.as_ref().and_then(|m| m.author_id.clone()) else {
            return;
        };
        match self.users.toggle_follow(&author_id).await {
            Ok(following) => {
                self.following_author = following;
                self.notifier
                    .success(if following { FOLLOWING } else { UNFOLLOWED });
            }
            Err(err) => {
                warn!(author_id = %author_id, error = %err, "Follow failed");
                self.notifier.error(FOLLOW_FAILED);
            }
        }
    }

    /// Fetch the material file and bump its download count.
    pub async fn download(&mut self) -> Option<(DownloadLink, Bytes)> {
        self.material.as_ref()?;
        match self.materials.download(&self.material_id).await {
            Ok(download) => {
                if let Some(material) = self.material.as_mut() {
                    material.total_download += 1;
                }
                self.notifier.success(DOWNLOAD_OK);
                Some(download)
            }
            Err(err) => {
                warn!(error = %err, "Download failed");
                self.notifier.error(DOWNLOAD_FAILED);
                None
            }
        }
    }

    /// First step of deletion: open the confirmation.
    pub fn request_delete(&mut self) {
        if self.material.is_some() {
            self.delete_requested = true;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.delete_requested = false;
    }

    /// Second step of deletion. Does nothing unless confirmation was
    /// requested. On success leaves for the viewer's materials list.
    pub async fn confirm_delete(&mut self) -> bool {
        if !self.delete_requested {
            debug!("Delete not confirmed");
            return false;
        }
        self.delete_requested = false;

        match self.materials.delete(&self.material_id).await {
            Ok(()) => {
                self.notifier.success(DELETED);
                self.material = None;
                let route = self.client.config().route("/my-materials");
                self.client.navigator().navigate(&route);
                true
            }
            Err(err) => {
                warn!(error = %err, "Delete failed");
                self.notifier.error(DELETE_FAILED);
                false
            }
        }
    }
}
