use serde::{Deserialize, Serialize};

use super::User;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Tokens returned by login, register and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(default, alias = "token")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Result of an auth flow. Auth flows report failures as values.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome<T> {
    Success(T),
    Failure(String),
}

impl<T> AuthOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthOutcome::Failure(message) => Some(message),
            AuthOutcome::Success(_) => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            AuthOutcome::Success(data) => Some(data),
            AuthOutcome::Failure(_) => None,
        }
    }
}
