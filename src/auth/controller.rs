//! Auth session controller.
//!
//! Wraps the auth endpoints and publishes `{user, is_authenticated,
//! is_loading}` through a `watch` channel. Flows never return errors: every
//! failure comes back as [`AuthOutcome::Failure`] with a display message.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::forms::{LoginForm, RegisterForm};
use super::session::SessionStore;
use crate::api::AuthApi;
use crate::error::{AuthError, NetworkError, PortalError};
use crate::models::{AuthOutcome, FileUpload, LoginCredentials, RegisterData, TokenResponse, User};

const LOGIN_FAILED: &str = "Erro ao realizar login.";
const REGISTER_FAILED: &str = "Erro ao criar conta.";

/// Observable auth state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// True only while the startup bootstrap runs
    pub is_loading: bool,
}

impl AuthState {
    fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }

    fn signed_out() -> Self {
        Self::default()
    }
}

/// Cheap to clone; clones publish to the same channel.
#[derive(Clone)]
pub struct AuthController {
    api: AuthApi,
    session: SessionStore,
    state_tx: Arc<watch::Sender<AuthState>>,
}

impl std::fmt::Debug for AuthController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthController")
            .field("state", &*self.state_tx.borrow())
            .finish()
    }
}

impl AuthController {
    /// Starts in the loading state until [`bootstrap`](Self::bootstrap) runs.
    pub fn new(api: AuthApi, session: SessionStore) -> Self {
        let (state_tx, _) = watch::channel(AuthState {
            is_loading: true,
            ..AuthState::default()
        });
        Self {
            api,
            session,
            state_tx: Arc::new(state_tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state_tx.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state_tx.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state_tx.borrow().is_authenticated
    }

    fn publish(&self, state: AuthState) {
        self.state_tx.send_replace(state);
    }

    /// Resolve the session found at startup.
    ///
    /// Shows the cached user right away, then confirms it with
    /// `GET /users/me`. Any failure logs the viewer out.
    pub async fn bootstrap(&self) {
        if self.session.get_token().is_none() {
            debug!("No stored session");
            self.publish(AuthState::signed_out());
            return;
        }

        if let Some(cached) = self.session.get_user() {
            self.publish(AuthState {
                user: Some(cached),
                is_authenticated: true,
                is_loading: true,
            });
        }

        match self.api.current_user().await {
            Ok(user) => {
                if let Err(err) = self.session.set_user(&user) {
                    warn!(error = %err, "Failed to cache current user");
                }
                info!(user_id = %user.id, "Session restored");
                self.publish(AuthState::signed_in(user));
            }
            Err(err) => {
                warn!(error = %err, "Stored session is no longer valid");
                self.discard_session();
                self.publish(AuthState::signed_out());
            }
        }
    }

    /// Validate the form, then log in.
    pub async fn login_form(&self, form: &LoginForm) -> AuthOutcome<User> {
        match form.validate() {
            Ok(credentials) => self.login(&credentials).await,
            Err(err) => AuthOutcome::Failure(err.to_string()),
        }
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> AuthOutcome<User> {
        let tokens = match self.api.login(credentials).await {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(error = %err, "Login failed");
                return AuthOutcome::Failure(failure_message(&err, LOGIN_FAILED));
            }
        };
        self.establish(tokens, LOGIN_FAILED).await
    }

    /// Validate the form, then register. A selected picture switches the
    /// request to multipart.
    pub async fn register_form(&self, form: &RegisterForm) -> AuthOutcome<User> {
        let data = match form.validate() {
            Ok(data) => data,
            Err(err) => return AuthOutcome::Failure(err.to_string()),
        };
        match &form.picture {
            Some(picture) => self.register_with_picture(&data, picture).await,
            None => self.register(&data).await,
        }
    }

    pub async fn register(&self, data: &RegisterData) -> AuthOutcome<User> {
        let result = self.api.register(data).await;
        self.finish_register(result).await
    }

    pub async fn register_with_picture(
        &self,
        data: &RegisterData,
        picture: &FileUpload,
    ) -> AuthOutcome<User> {
        let result = self.api.register_with_picture(data, picture).await;
        self.finish_register(result).await
    }

    async fn finish_register(
        &self,
        result: Result<TokenResponse, PortalError>,
    ) -> AuthOutcome<User> {
        let tokens = match result {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(error = %err, "Registration failed");
                return AuthOutcome::Failure(failure_message(&err, REGISTER_FAILED));
            }
        };

        // Some deployments answer register with the user only; the viewer
        // then signs in separately.
        if tokens.access_token.is_none() {
            return match tokens.user {
                Some(user) => {
                    info!(user_id = %user.id, "Account created");
                    AuthOutcome::Success(user)
                }
                None => AuthOutcome::Failure(REGISTER_FAILED.to_string()),
            };
        }
        self.establish(tokens, REGISTER_FAILED).await
    }

    /// Store the tokens, resolve the user and publish the signed-in state.
    async fn establish(&self, tokens: TokenResponse, fallback: &str) -> AuthOutcome<User> {
        if tokens.access_token.is_none() {
            warn!("Auth response carried no access token");
            return AuthOutcome::Failure(fallback.to_string());
        }
        if let Err(err) = self.session.store_tokens(&tokens) {
            warn!(error = %err, "Failed to persist session");
            return AuthOutcome::Failure(fallback.to_string());
        }

        let user = match self.api.current_user().await {
            Ok(user) => user,
            Err(err) => match tokens.user {
                Some(user) => {
                    debug!(error = %err, "Using the user from the auth response");
                    user
                }
                None => {
                    warn!(error = %err, "Could not resolve the signed-in user");
                    self.discard_session();
                    return AuthOutcome::Failure(fallback.to_string());
                }
            },
        };

        if let Err(err) = self.session.set_user(&user) {
            warn!(error = %err, "Failed to cache current user");
        }
        info!(user_id = %user.id, "Signed in");
        self.publish(AuthState::signed_in(user.clone()));
        AuthOutcome::Success(user)
    }

    /// Revoke the server session (best effort) and clear local state.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.session.get_refresh_token() {
            if let Err(err) = self.api.logout(&refresh_token).await {
                debug!(error = %err, "Server logout failed, clearing locally anyway");
            }
        }
        self.discard_session();
        self.publish(AuthState::signed_out());
        info!("Signed out");
    }

    /// Drop the published user if the stored session disappeared, e.g. after
    /// the API client expired it.
    pub fn sync_with_session(&self) {
        if self.session.get_token().is_none() && self.is_authenticated() {
            debug!("Session was cleared, publishing signed-out state");
            self.publish(AuthState::signed_out());
        }
    }

    fn discard_session(&self) {
        if let Err(err) = self.session.clear() {
            warn!(error = %err, "Failed to clear session");
        }
    }
}

/// Message shown for a failed flow: validation text, bad credentials, or the
/// server's own message, else `fallback`.
fn failure_message(err: &PortalError, fallback: &str) -> String {
    match err {
        PortalError::Validation(validation) => validation.to_string(),
        PortalError::Auth(AuthError::InvalidCredentials { .. }) => err.user_message(),
        PortalError::Network(NetworkError::HttpStatus { message, .. })
            if !message.trim().is_empty() =>
        {
            message.clone()
        }
        _ => fallback.to_string(),
    }
}
