//! Token storage trait abstraction.
//!
//! The session lives in durable key/value storage scoped to one origin. All
//! operations are synchronous; values are opaque strings.

use crate::error::StorageError;

/// Key holding the access token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Key holding the cached current user as JSON.
pub const USER_KEY: &str = "user";

/// Trait for durable session key/value storage.
///
/// Implementations include the production file-backed store and an
/// in-memory store for tests.
pub trait TokenStorage: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a single key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
