//! Application context.
//!
//! One object owns the long-lived pieces (configuration, session storage,
//! HTTP transport, navigator, notice queue, API client and auth controller)
//! and hands out per-view controllers that share them.

use std::sync::Arc;

use tracing::debug;

use crate::adapters::{FileTokenStorage, LogNavigator, ReqwestHttpClient};
use crate::api::{ApiClient, AuthApi, MaterialsApi, UsersApi};
use crate::auth::{AuthController, SessionStore};
use crate::config::ClientConfig;
use crate::detail::DetailController;
use crate::error::{NetworkError, PortalResult};
use crate::explore::ExploreController;
use crate::notifications::Notifier;
use crate::profile::ProfileController;
use crate::traits::{HttpClient, Navigator, TokenStorage};
use crate::upload::UploadController;

#[derive(Clone)]
pub struct AppContext {
    config: Arc<ClientConfig>,
    navigator: Arc<dyn Navigator>,
    client: ApiClient,
    auth: AuthController,
    notifier: Notifier,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("api_base", &self.config.api_base())
            .field("session_file", &self.config.session_file)
            .finish()
    }
}

impl AppContext {
    /// Production wiring from environment configuration.
    pub fn from_env() -> PortalResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    /// Production wiring: reqwest transport, file-backed session, logging
    /// navigator.
    pub fn new(config: ClientConfig) -> PortalResult<Self> {
        let http = ReqwestHttpClient::with_timeout(config.request_timeout)
            .map_err(|err| NetworkError::from_transport(err, &config.api_base()))?;
        let storage = FileTokenStorage::new(config.session_file.clone());
        debug!(session_file = %config.session_file.display(), "Using file session storage");
        Ok(Self::with_parts(
            config,
            Arc::new(http),
            Arc::new(storage),
            Arc::new(LogNavigator::new()),
        ))
    }

    /// Wire the context from explicit seams.
    pub fn with_parts(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        storage: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let config = Arc::new(config);
        let session = SessionStore::new(storage);
        let client = ApiClient::new(config.clone(), http, session.clone(), navigator.clone());
        let auth = AuthController::new(AuthApi::new(client.clone()), session);
        Self {
            config,
            navigator,
            client,
            auth,
            notifier: Notifier::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth(&self) -> &AuthController {
        &self.auth
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    pub fn materials(&self) -> MaterialsApi {
        MaterialsApi::new(self.client.clone())
    }

    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.client.clone())
    }

    pub fn explore(&self) -> ExploreController {
        ExploreController::new(
            self.materials(),
            self.auth.clone(),
            self.navigator.clone(),
            self.notifier.clone(),
        )
    }

    pub fn detail(&self) -> DetailController {
        DetailController::new(self.client.clone(), self.auth.clone(), self.notifier.clone())
    }

    pub fn upload(&self) -> UploadController {
        UploadController::new(self.client.clone())
    }

    pub fn profile(&self) -> ProfileController {
        ProfileController::new(self.client.clone(), self.auth.clone(), self.notifier.clone())
    }
}
