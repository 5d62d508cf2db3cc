//! Profile controller.
//!
//! Shows either the viewer's own profile (`/users/me`, own uploads, saved
//! materials, settings) or another user's public profile (uploads, follow
//! toggle). Failures of secondary lists are kept per list so one broken tab
//! never hides the others.

use tracing::{debug, info, warn};

use super::settings::SettingsForm;
use crate::api::{ApiClient, MaterialsApi, UsersApi};
use crate::auth::{check_image, AuthController};
use crate::models::{FileUpload, Material, Page, PaginationInfo, UserProfile, UserStats};
use crate::error::{PortalError, PortalResult};
use crate::notifications::Notifier;

/// Default page size for uploads and saved materials.
pub const PROFILE_PAGE_SIZE: u32 = 10;

pub const LOAD_FAILED: &str =
    "Não foi possível carregar os dados do perfil. Tente novamente mais tarde.";
pub const UPLOADS_FAILED: &str = "Não foi possível carregar os uploads. Tente novamente mais tarde.";
pub const SAVED_FAILED: &str =
    "Não foi possível carregar seus materiais salvos. Tente novamente mais tarde.";
pub const FOLLOWERS_FAILED: &str =
    "Não foi possível carregar os dados de seguidores. Tente novamente mais tarde.";
pub const SETTINGS_OK: &str = "Perfil atualizado com sucesso!";
pub const SETTINGS_FAILED: &str = "Não foi possível atualizar seu perfil. Tente novamente.";
pub const COVER_OK: &str = "Imagem de capa atualizada com sucesso!";
pub const COVER_FAILED: &str = "Não foi possível atualizar a imagem de capa";
pub const FOLLOW_LOGIN: &str = "Faça login para seguir este usuário";
pub const FOLLOWING: &str = "Agora você segue este usuário";
pub const UNFOLLOWED: &str = "Você deixou de seguir este usuário";
pub const FOLLOW_FAILED: &str = "Não foi possível seguir este usuário.";
pub const MATERIAL_DELETED: &str = "Material excluído com sucesso!";
pub const MATERIAL_DELETE_FAILED: &str = "Não foi possível excluir o material. Tente novamente.";

/// One paginated material list on the profile.
#[derive(Debug, Clone, Default)]
pub struct MaterialList {
    pub materials: Vec<Material>,
    pub pagination: PaginationInfo,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl MaterialList {
    fn apply(&mut self, result: PortalResult<Page<Material>>, failure: &str) {
        self.is_loading = false;
        match result {
            Ok(page) => {
                self.pagination = PaginationInfo::from_page(&page);
                self.materials = page.content;
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "Profile list failed to load");
                self.error = Some(failure.to_string());
            }
        }
    }

    fn page_size(&self) -> u32 {
        if self.pagination.size == 0 {
            PROFILE_PAGE_SIZE
        } else {
            self.pagination.size
        }
    }
}

pub struct ProfileController {
    client: ApiClient,
    users: UsersApi,
    materials: MaterialsApi,
    auth: AuthController,
    notifier: Notifier,

    profile: Option<UserProfile>,
    stats: Option<UserStats>,
    is_own: bool,
    is_loading: bool,
    error: Option<String>,
    following: bool,

    uploads: MaterialList,
    saved: MaterialList,
    followers: Vec<UserProfile>,
    followers_error: Option<String>,
    is_saving: bool,
}

impl std::fmt::Debug for ProfileController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileController")
            .field("profile_id", &self.profile.as_ref().map(|p| p.id.as_str()))
            .field("is_own", &self.is_own)
            .finish()
    }
}

impl ProfileController {
    pub fn new(client: ApiClient, auth: AuthController, notifier: Notifier) -> Self {
        Self {
            users: UsersApi::new(client.clone()),
            materials: MaterialsApi::new(client.clone()),
            client,
            auth,
            notifier,
            profile: None,
            stats: None,
            is_own: false,
            is_loading: false,
            error: None,
            following: false,
            uploads: MaterialList::default(),
            saved: MaterialList::default(),
            followers: Vec::new(),
            followers_error: None,
            is_saving: false,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn stats(&self) -> Option<UserStats> {
        self.stats
    }

    pub fn is_own(&self) -> bool {
        self.is_own
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn uploads(&self) -> &MaterialList {
        &self.uploads
    }

    pub fn saved(&self) -> &MaterialList {
        &self.saved
    }

    pub fn followers(&self) -> &[UserProfile] {
        &self.followers
    }

    pub fn followers_error(&self) -> Option<&str> {
        self.followers_error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// Settings form pre-filled from the loaded profile.
    pub fn settings_form(&self) -> SettingsForm {
        self.profile
            .as_ref()
            .map(SettingsForm::from_profile)
            .unwrap_or_default()
    }

    /// Load a profile. `None`, or the viewer's own id, shows the viewer's
    /// profile, which requires a session: without one the user is sent to
    /// the login route and nothing is fetched.
    pub async fn load(&mut self, user_id: Option<&str>) {
        let viewer_id = self.auth.user().map(|u| u.id);
        self.is_own = match user_id {
            None => true,
            Some(id) => viewer_id.as_deref() == Some(id),
        };
        self.profile = None;
        self.stats = None;
        self.error = None;
        self.following = false;
        self.followers.clear();
        self.followers_error = None;
        self.uploads = MaterialList::default();
        self.saved = MaterialList::default();

        if self.is_own && !self.auth.is_authenticated() {
            info!("Own profile requested without a session, redirecting to login");
            let route = self.client.config().route("/login");
            self.client.navigator().navigate(&route);
            return;
        }

        self.is_loading = true;
        let result = match (self.is_own, user_id) {
            (false, Some(id)) => self.users.profile(id).await,
            _ => self.users.me().await,
        };
        let profile = match result {
            Ok(profile) => profile,
            Err(err) => {
                warn!(user_id = ?user_id, error = %err, "Failed to load profile");
                self.error = Some(LOAD_FAILED.to_string());
                self.is_loading = false;
                return;
            }
        };
        debug!(user_id = %profile.id, is_own = self.is_own, "Profile loaded");

        self.stats = match profile.stats {
            Some(stats) => Some(stats),
            None => match self.users.stats(&profile.id).await {
                Ok(stats) => Some(stats),
                Err(err) => {
                    debug!(error = %err, "Profile stats unavailable");
                    None
                }
            },
        };

        if !self.is_own && self.auth.is_authenticated() {
            match self.users.follow_status(&profile.id).await {
                Ok(following) => self.following = following,
                Err(err) => debug!(error = %err, "Follow status unavailable"),
            }
        }

        self.profile = Some(profile);
        self.is_loading = false;
        self.load_uploads(0, PROFILE_PAGE_SIZE).await;
    }

    /// Own uploads come from `/materials/me`, anyone else's from
    /// `/users/{id}/materials`.
    pub async fn load_uploads(&mut self, page: u32, size: u32) {
        let Some(profile_id) = self.profile.as_ref().map(|p| p.id.clone()) else {
            return;
        };
        self.uploads.is_loading = true;
        let result = if self.is_own {
            self.materials.mine(page, size).await
        } else {
            self.users.materials(&profile_id, page, size).await
        };
        self.uploads.apply(result, UPLOADS_FAILED);
    }

    /// Out-of-range pages are ignored.
    pub async fn set_uploads_page(&mut self, page: u32) {
        if page >= self.uploads.pagination.total_pages {
            return;
        }
        let size = self.uploads.page_size();
        self.load_uploads(page, size).await;
    }

    pub async fn set_uploads_page_size(&mut self, size: u32) {
        self.load_uploads(0, size.max(1)).await;
    }

    /// Saved materials exist only on the viewer's own profile.
    pub async fn load_saved(&mut self, page: u32, size: u32) {
        if !self.is_own || self.profile.is_none() {
            return;
        }
        self.saved.is_loading = true;
        let result = self.users.saved_materials(page, size).await;
        self.saved.apply(result, SAVED_FAILED);
    }

    pub async fn load_followers(&mut self) {
        let Some(profile_id) = self.profile.as_ref().map(|p| p.id.clone()) else {
            return;
        };
        match self.users.followers(&profile_id).await {
            Ok(followers) => {
                self.followers = followers;
                self.followers_error = None;
            }
            Err(err) => {
                warn!(user_id = %profile_id, error = %err, "Failed to load followers");
                self.followers_error = Some(FOLLOWERS_FAILED.to_string());
            }
        }
    }

    pub async fn toggle_follow(&mut self) {
        if self.is_own {
            return;
        }
        if !self.auth.is_authenticated() {
            self.notifier.info(FOLLOW_LOGIN);
            return;
        }
        let Some(profile_id) = self.profile.as_ref().map(|p| p.id.clone()) else {
            return;
        };
        match self.users.toggle_follow(&profile_id).await {
            Ok(following) => {
                if following != self.following {
                    if let Some(stats) = self.stats.as_mut() {
                        stats.followers = (stats.followers + if following { 1 } else { -1 }).max(0);
                    }
                }
                self.following = following;
                self.notifier
                    .success(if following { FOLLOWING } else { UNFOLLOWED });
            }
            Err(err) => {
                warn!(user_id = %profile_id, error = %err, "Follow failed");
                self.notifier.error(FOLLOW_FAILED);
            }
        }
    }

    /// Submit the settings form. Validation failures are reported as a
    /// notice and nothing is sent. The password change goes out after the
    /// profile update succeeds.
    pub async fn save_settings(&mut self, form: &SettingsForm) -> bool {
        if !self.is_own {
            return false;
        }
        let submission = match form.validate() {
            Ok(submission) => submission,
            Err(err) => {
                self.notifier.error(err.to_string());
                return false;
            }
        };

        self.is_saving = true;
        let users = &self.users;
        let result = async {
            let profile = match &submission.picture {
                Some(picture) => {
                    users
                        .update_me_with_picture(&submission.update, picture)
                        .await?
                }
                None => users.update_me(&submission.update).await?,
            };
            if let Some(change) = &submission.password {
                users.change_password(change).await?;
            }
            Ok::<_, PortalError>(profile)
        }
        .await;
        self.is_saving = false;

        match result {
            Ok(profile) => {
                info!(user_id = %profile.id, "Profile updated");
                self.profile = Some(profile);
                self.notifier.success(SETTINGS_OK);
                true
            }
            Err(err) => {
                warn!(error = %err, "Profile update failed");
                self.notifier.error(SETTINGS_FAILED);
                false
            }
        }
    }

    pub async fn update_cover_image(&mut self, image: &FileUpload) -> bool {
        if !self.is_own {
            return false;
        }
        if let Err(err) = check_image(image) {
            self.notifier.error(err.to_string());
            return false;
        }
        match self.users.update_cover_image(image).await {
            Ok(profile) => {
                info!(user_id = %profile.id, "Cover image updated");
                self.profile = Some(profile);
                self.notifier.success(COVER_OK);
                true
            }
            Err(err) => {
                warn!(error = %err, "Cover image update failed");
                self.notifier.error(COVER_FAILED);
                false
            }
        }
    }

    /// Delete one of the viewer's uploads and reload the current page.
    pub async fn delete_upload(&mut self, material_id: &str) -> bool {
        if !self.is_own {
            return false;
        }
        match self.materials.delete(material_id).await {
            Ok(()) => {
                let page = self.uploads.pagination.current_page;
                let size = self.uploads.page_size();
                self.load_uploads(page, size).await;
                self.notifier.success(MATERIAL_DELETED);
                true
            }
            Err(err) => {
                warn!(material_id, error = %err, "Delete failed");
                self.notifier.error(MATERIAL_DELETE_FAILED);
                false
            }
        }
    }
}
