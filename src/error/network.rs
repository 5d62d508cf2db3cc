//! Network-related error types.
//!
//! Errors raised while talking to the portal API: transport failures and
//! server-rejected requests.

use std::fmt;

use crate::traits::HttpError;

/// Generic fallback shown when the server gives no usable message.
pub const GENERIC_SERVER_MESSAGE: &str = "Ocorreu um erro inesperado. Tente novamente.";

/// Network-specific error variants.
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    Timeout { message: String },

    /// Non-2xx response other than an authentication failure.
    HttpStatus { status: u16, message: String },

    /// The response body could not be decoded.
    InvalidResponse { message: String },

    /// Generic transport error.
    Other { message: String },
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::InvalidResponse { .. } => false,
            NetworkError::Other { .. } => false,
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a user-facing message. Server-provided messages win over the
    /// generic text.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } | NetworkError::Other { .. } => {
                "Não foi possível conectar ao servidor. Verifique sua conexão.".to_string()
            }
            NetworkError::Timeout { .. } => {
                "O servidor demorou demais para responder. Tente novamente.".to_string()
            }
            NetworkError::HttpStatus { message, .. } => {
                if message.trim().is_empty() {
                    GENERIC_SERVER_MESSAGE.to_string()
                } else {
                    message.clone()
                }
            }
            NetworkError::InvalidResponse { .. } => GENERIC_SERVER_MESSAGE.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }

    /// Convert a transport error for the given URL.
    pub fn from_transport(err: HttpError, url: &str) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Timeout(message) => NetworkError::Timeout { message },
            HttpError::Io(message) => NetworkError::InvalidResponse { message },
            HttpError::InvalidUrl(message) | HttpError::Other(message) => {
                NetworkError::Other { message }
            }
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout { message } => write!(f, "Request timed out: {}", message),
            NetworkError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            NetworkError::InvalidResponse { message } => {
                write!(f, "Invalid response: {}", message)
            }
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        NetworkError::InvalidResponse {
            message: err.to_string(),
        }
    }
}

/// Extract a server-provided message from an error response body.
///
/// Looks at the JSON `message` field, then `error`, then falls back to a
/// short plain-text body. Returns `None` when nothing usable is present.
pub fn extract_server_message(body: &[u8]) -> Option<String> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    return Some(text.trim().to_string());
                }
            }
        }
        if let Some(text) = value.as_str() {
            if !text.trim().is_empty() {
                return Some(text.trim().to_string());
            }
        }
        return None;
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() || text.len() > 300 || text.starts_with('<') {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_is_retryable() {
        let err = NetworkError::ConnectionFailed {
            url: "http://localhost:8080".to_string(),
            message: "Connection refused".to_string(),
        };
        assert!(err.is_retryable());
        assert_eq!(err.error_code(), "E_NET_CONN");
    }

    #[test]
    fn test_http_status_retry_policy() {
        let server = NetworkError::HttpStatus {
            status: 503,
            message: String::new(),
        };
        let client = NetworkError::HttpStatus {
            status: 400,
            message: String::new(),
        };
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert_eq!(client.status(), Some(400));
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = NetworkError::HttpStatus {
            status: 400,
            message: "Título já existe".to_string(),
        };
        assert_eq!(err.user_message(), "Título já existe");

        let err = NetworkError::HttpStatus {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_SERVER_MESSAGE);
    }

    #[test]
    fn test_from_transport() {
        let err = NetworkError::from_transport(
            HttpError::ConnectionFailed("refused".to_string()),
            "http://api",
        );
        assert!(matches!(err, NetworkError::ConnectionFailed { ref url, .. } if url == "http://api"));

        let err = NetworkError::from_transport(HttpError::Timeout("slow".to_string()), "x");
        assert_eq!(err.error_code(), "E_NET_TIMEOUT");
    }

    #[test]
    fn test_extract_server_message_json() {
        assert_eq!(
            extract_server_message(br#"{"message":"Material not found"}"#),
            Some("Material not found".to_string())
        );
        assert_eq!(
            extract_server_message(br#"{"error":"Bad Request","status":400}"#),
            Some("Bad Request".to_string())
        );
        assert_eq!(extract_server_message(br#"{"status":500}"#), None);
        assert_eq!(extract_server_message(br#""quoted""#), Some("quoted".to_string()));
    }

    #[test]
    fn test_extract_server_message_text() {
        assert_eq!(
            extract_server_message(b"Forbidden"),
            Some("Forbidden".to_string())
        );
        assert_eq!(extract_server_message(b""), None);
        assert_eq!(extract_server_message(b"<html>oops</html>"), None);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: NetworkError = json_err.into();
        assert_eq!(err.error_code(), "E_NET_INVALID");
    }
}
