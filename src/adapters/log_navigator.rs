//! Navigator adapter for the command-line driver.
//!
//! There is no address bar outside a browser, so the current location is
//! kept in memory and every change is logged.

use std::sync::Mutex;

use tracing::info;

use crate::traits::Navigator;

/// Keeps the current route and query string and logs each change.
#[derive(Debug, Default)]
pub struct LogNavigator {
    location: Mutex<Location>,
}

#[derive(Debug, Default, Clone)]
struct Location {
    path: String,
    query: String,
}

impl LogNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current location as `path?query`.
    pub fn current(&self) -> String {
        let location = self
            .location
            .lock()
            .map(|l| l.clone())
            .unwrap_or_default();
        if location.query.is_empty() {
            location.path
        } else {
            format!("{}?{}", location.path, location.query)
        }
    }
}

impl Navigator for LogNavigator {
    fn replace_query(&self, query: &str) {
        if let Ok(mut location) = self.location.lock() {
            location.query = query.to_string();
        }
        info!(query, "Location query replaced");
    }

    fn navigate(&self, path: &str) {
        if let Ok(mut location) = self.location.lock() {
            location.path = path.to_string();
            location.query.clear();
        }
        info!(path, "Navigated");
    }
}
