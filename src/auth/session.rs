//! Session/token store.
//!
//! Thin typed layer over [`TokenStorage`]: the access token, the refresh
//! token and a cached copy of the signed-in user. Token values are opaque
//! and never validated or logged.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::models::{TokenResponse, User};
use crate::traits::{TokenStorage, REFRESH_TOKEN_KEY, TOKEN_KEY, USER_KEY};

/// Tokens of an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Session store shared by the API client and the auth controller.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("has_token", &self.get_token().is_some())
            .finish()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self { storage }
    }

    /// Read a key. Storage failures read as absent.
    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                warn!(key, error = %err, "Session storage read failed");
                None
            }
        }
    }

    pub fn get_token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    pub fn set_refresh_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(REFRESH_TOKEN_KEY, token)
    }

    /// Cached signed-in user. An unreadable cache reads as absent.
    pub fn get_user(&self) -> Option<User> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "Ignoring unreadable cached user");
                None
            }
        }
    }

    pub fn set_user(&self, user: &User) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &raw)
    }

    pub fn remove_user(&self) -> Result<(), StorageError> {
        self.storage.remove(USER_KEY)
    }

    /// Current session, if an access token is stored.
    pub fn session(&self) -> Option<Session> {
        self.get_token().map(|access_token| Session {
            access_token,
            refresh_token: self.get_refresh_token(),
        })
    }

    /// Persist whatever a login, register or refresh response carried. A
    /// missing refresh token leaves the stored one in place.
    pub fn store_tokens(&self, tokens: &TokenResponse) -> Result<(), StorageError> {
        if let Some(access) = tokens.access_token.as_deref() {
            self.set_token(access)?;
        }
        if let Some(refresh) = tokens.refresh_token.as_deref() {
            self.set_refresh_token(refresh)?;
        }
        if let Some(user) = &tokens.user {
            self.set_user(user)?;
        }
        Ok(())
    }

    /// Remove every session key. Keeps going past individual failures and
    /// reports the first one.
    pub fn clear(&self) -> Result<(), StorageError> {
        debug!("Clearing session");
        let mut first_err = None;
        for key in [TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.storage.remove(key) {
                warn!(key, error = %err, "Failed to remove session key");
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
