//! Unified error type for the portal client.
//!
//! `PortalError` consolidates the domain errors so callers get one type with
//! consistent categorization, user messages and retry hints.

use std::fmt;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::network::NetworkError;
use super::storage::StorageError;
use super::validation::ValidationError;
use crate::config::ConfigError;

/// Unified error type for the portal client.
#[derive(Debug)]
pub enum PortalError {
    /// Transport failures and server-rejected requests.
    Network(NetworkError),

    /// Authentication/authorization errors.
    Auth(AuthError),

    /// Client-side validation failures.
    Validation(ValidationError),

    /// Durable session storage errors.
    Storage(StorageError),

    /// Configuration errors.
    Config(ConfigError),
}

impl PortalError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            PortalError::Network(err) => match err {
                NetworkError::HttpStatus { .. } | NetworkError::InvalidResponse { .. } => {
                    ErrorCategory::Server
                }
                _ => ErrorCategory::Network,
            },
            PortalError::Auth(_) => ErrorCategory::Auth,
            PortalError::Validation(_) => ErrorCategory::User,
            PortalError::Storage(_) => ErrorCategory::System,
            PortalError::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            PortalError::Network(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Check if the user has to sign in again.
    pub fn requires_reauth(&self) -> bool {
        match self {
            PortalError::Auth(err) => err.requires_reauth(),
            _ => false,
        }
    }

    /// HTTP status of a server-rejected request, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            PortalError::Network(err) => err.status(),
            PortalError::Auth(AuthError::Unauthorized { .. }) => Some(401),
            PortalError::Auth(AuthError::AccessDenied { .. }) => Some(403),
            _ => None,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            PortalError::Network(err) => err.user_message(),
            PortalError::Auth(err) => err.user_message(),
            PortalError::Validation(err) => err.to_string(),
            PortalError::Storage(_) => {
                "Não foi possível acessar os dados da sessão neste dispositivo.".to_string()
            }
            PortalError::Config(err) => format!("Configuração inválida: {}", err),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            PortalError::Network(err) => err.error_code(),
            PortalError::Auth(err) => err.error_code(),
            PortalError::Validation(err) => err.error_code(),
            PortalError::Storage(err) => err.error_code(),
            PortalError::Config(_) => "E_CONFIG",
        }
    }

    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            PortalError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalError::Network(err) => write!(f, "{}", err),
            PortalError::Auth(err) => write!(f, "{}", err),
            PortalError::Validation(err) => write!(f, "Validation failed: {}", err),
            PortalError::Storage(err) => write!(f, "{}", err),
            PortalError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PortalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PortalError::Network(err) => Some(err),
            PortalError::Auth(err) => Some(err),
            PortalError::Validation(err) => Some(err),
            PortalError::Storage(err) => Some(err),
            PortalError::Config(err) => Some(err),
        }
    }
}

impl From<NetworkError> for PortalError {
    fn from(err: NetworkError) -> Self {
        PortalError::Network(err)
    }
}

impl From<AuthError> for PortalError {
    fn from(err: AuthError) -> Self {
        PortalError::Auth(err)
    }
}

impl From<ValidationError> for PortalError {
    fn from(err: ValidationError) -> Self {
        PortalError::Validation(err)
    }
}

impl From<StorageError> for PortalError {
    fn from(err: StorageError) -> Self {
        PortalError::Storage(err)
    }
}

impl From<ConfigError> for PortalError {
    fn from(err: ConfigError) -> Self {
        PortalError::Config(err)
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::Network(NetworkError::from(err))
    }
}
