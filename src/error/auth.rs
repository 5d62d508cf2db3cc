//! Authentication-related error types.
//!
//! Errors raised by the session lifecycle: rejected credentials, expired
//! sessions and failed silent refreshes.

use std::fmt;

/// Authentication-specific error variants.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// The server answered 401 for a request.
    Unauthorized { message: String },

    /// The server answered 403 for a request.
    AccessDenied { message: String },

    /// Login was rejected by the server.
    InvalidCredentials { message: String },

    /// A 401 arrived and no refresh token was stored.
    NoRefreshToken,

    /// The silent refresh request failed.
    RefreshFailed { message: String },

    /// The request was retried with a fresh token and still got a 401.
    SessionExpired,

    /// An action requires a signed-in user and there is none.
    NotAuthenticated,
}

impl AuthError {
    /// Check if this error can only be resolved by signing in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::Unauthorized { .. }
                | AuthError::NoRefreshToken
                | AuthError::RefreshFailed { .. }
                | AuthError::SessionExpired
                | AuthError::NotAuthenticated
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Unauthorized { .. }
            | AuthError::NoRefreshToken
            | AuthError::RefreshFailed { .. }
            | AuthError::SessionExpired => {
                "Sua sessão expirou. Faça login novamente.".to_string()
            }
            AuthError::AccessDenied { message } => {
                if message.trim().is_empty() {
                    "Você não tem permissão para realizar esta ação.".to_string()
                } else {
                    message.clone()
                }
            }
            AuthError::InvalidCredentials { message } => {
                if message.trim().is_empty() {
                    "E-mail ou senha inválidos.".to_string()
                } else {
                    message.clone()
                }
            }
            AuthError::NotAuthenticated => "Faça login para continuar.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthorized { .. } => "E_AUTH_UNAUTHORIZED",
            AuthError::AccessDenied { .. } => "E_AUTH_ACCESS",
            AuthError::InvalidCredentials { .. } => "E_AUTH_INVALID",
            AuthError::NoRefreshToken => "E_AUTH_NO_REFRESH",
            AuthError::RefreshFailed { .. } => "E_AUTH_REFRESH_FAIL",
            AuthError::SessionExpired => "E_AUTH_EXPIRED",
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            AuthError::AccessDenied { message } => write!(f, "Access denied: {}", message),
            AuthError::InvalidCredentials { message } => {
                write!(f, "Invalid credentials: {}", message)
            }
            AuthError::NoRefreshToken => write!(f, "No refresh token available"),
            AuthError::RefreshFailed { message } => {
                write!(f, "Token refresh failed: {}", message)
            }
            AuthError::SessionExpired => write!(f, "Session expired after token refresh"),
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_reauth() {
        assert!(AuthError::SessionExpired.requires_reauth());
        assert!(AuthError::NoRefreshToken.requires_reauth());
        assert!(AuthError::RefreshFailed {
            message: "expired".to_string()
        }
        .requires_reauth());
        assert!(!AuthError::AccessDenied {
            message: String::new()
        }
        .requires_reauth());
        assert!(!AuthError::InvalidCredentials {
            message: String::new()
        }
        .requires_reauth());
    }

    #[test]
    fn test_invalid_credentials_message() {
        let err = AuthError::InvalidCredentials {
            message: "Usuário não encontrado".to_string(),
        };
        assert_eq!(err.user_message(), "Usuário não encontrado");

        let err = AuthError::InvalidCredentials {
            message: String::new(),
        };
        assert_eq!(err.user_message(), "E-mail ou senha inválidos.");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AuthError::NoRefreshToken.to_string(),
            "No refresh token available"
        );
        assert_eq!(AuthError::NotAuthenticated.error_code(), "E_AUTH_NOT_AUTH");
    }
}
