//! Client configuration.
//!
//! Loaded from the environment at startup, with builder-style overrides for
//! tests and the CLI.
//!
//! # Example
//!
//! ```ignore
//! use portal::config::ClientConfig;
//!
//! let config = ClientConfig::default()
//!     .with_api_url("https://api.example.edu")
//!     .with_base_path("/portal/");
//! assert_eq!(config.api_base(), "https://api.example.edu/v1");
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the API origin.
pub const API_URL_VAR: &str = "VITE_API_URL";
/// Environment variable holding the deployment base path.
pub const BASE_PATH_VAR: &str = "VITE_BASE_PATH";
/// Environment variable overriding the session file location.
pub const SESSION_FILE_VAR: &str = "PORTAL_SESSION_FILE";
/// Environment variable overriding the like debounce window.
pub const LIKE_DEBOUNCE_VAR: &str = "PORTAL_LIKE_DEBOUNCE_MS";

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_BASE_PATH: &str = "/";
const DEFAULT_LIKE_DEBOUNCE_MS: u64 = 500;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const API_VERSION_PREFIX: &str = "/v1";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API origin without the version prefix (e.g. `http://localhost:8080`).
    pub api_url: String,
    /// Deployment base path for application routes.
    pub base_path: String,
    /// Location of the durable session file.
    pub session_file: PathBuf,
    /// Window during which repeated like submissions are ignored.
    pub like_debounce: Duration,
    /// Per-request timeout for the production HTTP client.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            session_file: default_session_file(),
            like_debounce: Duration::from_millis(DEFAULT_LIKE_DEBOUNCE_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(API_URL_VAR) {
            let url = url.trim();
            if !url.is_empty() {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidValue(
                        API_URL_VAR.to_string(),
                        format!("'{}' is not an http(s) URL", url),
                    ));
                }
                config.api_url = url.to_string();
            }
        }

        if let Ok(base) = std::env::var(BASE_PATH_VAR) {
            if !base.trim().is_empty() {
                config.base_path = base.trim().to_string();
            }
        }

        if let Ok(path) = std::env::var(SESSION_FILE_VAR) {
            if !path.trim().is_empty() {
                config.session_file = PathBuf::from(path.trim());
            }
        }

        if let Ok(ms) = std::env::var(LIKE_DEBOUNCE_VAR) {
            let ms = ms.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    LIKE_DEBOUNCE_VAR.to_string(),
                    format!("'{}' is not a number of milliseconds", ms),
                )
            })?;
            config.like_debounce = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    pub fn with_like_debounce(mut self, debounce: Duration) -> Self {
        self.like_debounce = debounce;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Versioned API base. This is the only place the `/v1` prefix is added.
    pub fn api_base(&self) -> String {
        let trimmed = self.api_url.trim_end_matches('/');
        if trimmed.ends_with(API_VERSION_PREFIX) {
            trimmed.to_string()
        } else {
            format!("{}{}", trimmed, API_VERSION_PREFIX)
        }
    }

    /// Absolute URL for an API path such as `/materials/1`.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base(), path)
        } else {
            format!("{}/{}", self.api_base(), path)
        }
    }

    /// Application route under the deployment base path.
    pub fn route(&self, path: &str) -> String {
        let base = self.base_path.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let base = if base.is_empty() || base.starts_with('/') {
            base.to_string()
        } else {
            format!("/{}", base)
        };
        format!("{}/{}", base, path)
    }
}

fn default_session_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".portal")
        .join("session.json")
}
