//! Error category classification for unified error handling.
//!
//! Categories drive how a failure surfaces: a transient toast, an inline
//! field message, or a redirect to the login screen.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport failures (connection, DNS, timeout).
    Network,

    /// Authentication/authorization failures (401, 403, refresh failure).
    Auth,

    /// Server-rejected requests (4xx other than auth, 5xx, unreadable bodies).
    Server,

    /// Client-side validation caught before any network call.
    User,

    /// Local storage failures.
    System,

    /// Invalid or missing configuration.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Whether failures of this category are shown inline next to the form
    /// that produced them rather than as a transient notice.
    pub fn is_inline(&self) -> bool {
        matches!(self, ErrorCategory::User)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::User.is_retryable());
        assert!(!ErrorCategory::Configuration.is_retryable());
    }

    #[test]
    fn test_only_user_errors_are_inline() {
        assert!(ErrorCategory::User.is_inline());
        assert!(!ErrorCategory::Network.is_inline());
        assert!(!ErrorCategory::Server.is_inline());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Network.to_string(), "network");
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
    }
}
