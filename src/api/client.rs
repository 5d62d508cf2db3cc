//! Shared HTTP entry point for the portal API.
//!
//! Every request carries `Authorization: Bearer <token>` when a token is
//! stored. A 401 triggers one silent refresh through
//! `POST /auth/refresh-token`; the request is then re-sent once with the new
//! token. A failed refresh or a second 401 clears the session and sends the
//! user to the login route.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::session::SessionStore;
use crate::config::ClientConfig;
use crate::error::{extract_server_message, AuthError, NetworkError, PortalError, PortalResult};
use crate::models::TokenResponse;
use crate::traits::{HttpClient, HttpRequest, Method, MultipartPart, Navigator, RequestBody, Response};

/// Whether the refresh-on-401 policy applies to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Refresh once on 401, then give up.
    Refresh,
    /// Surface a 401 as-is. Used by the auth endpoints themselves.
    Public,
}

/// One logical API call, relative to the versioned API base.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub policy: AuthPolicy,
}

impl ApiCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            policy: AuthPolicy::Refresh,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter. Order is preserved on the wire.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when present.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> PortalResult<Self> {
        self.body = RequestBody::Json(serde_json::to_string(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, parts: Vec<MultipartPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn public(mut self) -> Self {
        self.policy = AuthPolicy::Public;
        self
    }
}

/// The API client. Cheap to clone; clones share the session and transport.
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    config: Arc<ClientConfig>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_base", &self.config.api_base())
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        config: Arc<ClientConfig>,
        http: Arc<dyn HttpClient>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            session,
            navigator,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Absolute URL for a call.
    pub fn url_for(&self, call: &ApiCall) -> String {
        let mut url = self.config.endpoint(&call.path);
        if !call.query.is_empty() {
            let query = call
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Send a call, applying the refresh-once policy, and return the 2xx
    /// response.
    pub async fn send(&self, call: &ApiCall) -> PortalResult<Response> {
        let url = self.url_for(call);
        let token = self.session.get_token();
        let response = self.dispatch(call, &url, token.as_deref()).await?;

        if response.status != 401 || call.policy == AuthPolicy::Public {
            return into_result(response);
        }

        info!(method = %call.method, path = %call.path, "Got 401, attempting token refresh");
        let fresh_token = match self.refresh_access_token().await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "Token refresh failed");
                self.expire_session();
                return Err(err);
            }
        };

        let retried = self.dispatch(call, &url, Some(&fresh_token)).await?;
        if retried.status == 401 {
            warn!(method = %call.method, path = %call.path, "Still unauthorized after refresh");
            self.expire_session();
            return Err(AuthError::SessionExpired.into());
        }
        into_result(retried)
    }

    /// Send and decode a JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, call: &ApiCall) -> PortalResult<T> {
        let response = self.send(call).await?;
        decode(&response)
    }

    /// Send and decode a boolean answer, bare (`true`) or wrapped
    /// (`{"<key>": true}`).
    pub async fn send_flag(&self, call: &ApiCall, key: &str) -> PortalResult<bool> {
        let response = self.send(call).await?;
        decode_flag(&response, key)
    }

    /// Fetch an absolute URL without credentials (presigned download links).
    pub async fn fetch_absolute(&self, url: &str) -> PortalResult<Response> {
        let request = HttpRequest::new(Method::Get, url);
        let response = self
            .http
            .send(&request)
            .await
            .map_err(|e| NetworkError::from_transport(e, url))?;
        into_result(response)
    }

    async fn dispatch(
        &self,
        call: &ApiCall,
        url: &str,
        token: Option<&str>,
    ) -> PortalResult<Response> {
        let mut request = HttpRequest::new(call.method, url)
            .with_header("Accept", "application/json")
            .with_body(call.body.clone());
        if let Some(token) = token {
            request = request.with_header("Authorization", format!("Bearer {}", token));
        }

        debug!(method = %call.method, url, authenticated = token.is_some(), "API request");
        let response = self
            .http
            .send(&request)
            .await
            .map_err(|e| NetworkError::from_transport(e, url))?;
        debug!(method = %call.method, url, status = response.status, "API response");
        Ok(response)
    }

    /// Exchange the stored refresh token for a new access token and persist
    /// it. Sent without credentials and never retried.
    async fn refresh_access_token(&self) -> PortalResult<String> {
        let refresh_token = self
            .session
            .get_refresh_token()
            .ok_or(AuthError::NoRefreshToken)?;

        let url = self.config.endpoint("/auth/refresh-token");
        let body = serde_json::json!({ "refreshToken": refresh_token });
        let request = HttpRequest::new(Method::Post, &url)
            .with_header("Accept", "application/json")
            .with_body(RequestBody::Json(body.to_string()));

        let response = self.http.send(&request).await.map_err(|e| {
            PortalError::from(AuthError::RefreshFailed {
                message: e.to_string(),
            })
        })?;

        if !response.is_success() {
            return Err(AuthError::RefreshFailed {
                message: format!(
                    "HTTP {}: {}",
                    response.status,
                    extract_server_message(&response.body).unwrap_or_default()
                ),
            }
            .into());
        }

        let tokens: TokenResponse = response.json().map_err(|e| AuthError::RefreshFailed {
            message: e.to_string(),
        })?;
        let access = tokens.access_token.clone().ok_or(AuthError::RefreshFailed {
            message: "refresh response carried no access token".to_string(),
        })?;

        self.session.store_tokens(&TokenResponse {
            user: None,
            ..tokens
        })?;
        info!("Access token refreshed");
        Ok(access)
    }

    /// Drop the local session and route to the login screen.
    fn expire_session(&self) {
        if let Err(err) = self.session.clear() {
            warn!(error = %err, "Failed to clear session after auth failure");
        }
        self.navigator.navigate(&self.config.route("/login"));
    }
}

/// Map a response to `Ok` when 2xx, otherwise to the matching error.
fn into_result(response: Response) -> PortalResult<Response> {
    if response.is_success() {
        return Ok(response);
    }
    let message = extract_server_message(&response.body).unwrap_or_default();
    Err(match response.status {
        401 => AuthError::Unauthorized { message }.into(),
        403 => AuthError::AccessDenied { message }.into(),
        status => NetworkError::HttpStatus { status, message }.into(),
    })
}

/// Decode a JSON body.
pub fn decode<T: DeserializeOwned>(response: &Response) -> PortalResult<T> {
    response
        .json()
        .map_err(|e| NetworkError::InvalidResponse { message: e.to_string() }.into())
}

/// Decode a boolean answer that may be bare or wrapped in an object.
pub fn decode_flag(response: &Response, key: &str) -> PortalResult<bool> {
    let value: serde_json::Value = decode(response)?;
    let flag = match &value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Object(map) => map.get(key).and_then(|v| v.as_bool()),
        _ => None,
    };
    flag.ok_or_else(|| {
        NetworkError::InvalidResponse {
            message: format!("expected a boolean '{}' in {}", key, value),
        }
        .into()
    })
}
