//! In-memory session storage for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::StorageError;
use crate::traits::TokenStorage;

/// In-memory token storage.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the code under test wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with the given pairs.
    pub fn with_values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let storage = Self::new();
        {
            let mut values = storage.values.lock().unwrap();
            for (key, value) in pairs {
                values.insert(key.to_string(), value.to_string());
            }
        }
        storage
    }

    /// Make `set` and `remove` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().unwrap().is_empty()
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if *self.fail_writes.lock().unwrap() {
            Err(StorageError::Unavailable("writes disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

impl TokenStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let storage = InMemoryStorage::new();
        let handle = storage.clone();
        storage.set("token", "abc").unwrap();
        assert_eq!(handle.get("token").unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn test_failing_writes() {
        let storage = InMemoryStorage::with_values([("token", "abc")]);
        storage.set_fail_writes(true);
        assert!(storage.set("token", "def").is_err());
        assert!(storage.remove("token").is_err());
        assert_eq!(storage.get("token").unwrap(), Some("abc".to_string()));
    }
}
