//! Leading-edge submission gate.
//!
//! The first submission for a key goes through immediately; repeats for the
//! same key inside the window are dropped. Used to keep double clicks on
//! like buttons from reaching the server twice.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::trace;

/// Default window for like toggles.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct SubmissionGate {
    window: Duration,
    last_accepted: HashMap<String, Instant>,
}

impl Default for SubmissionGate {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl SubmissionGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns true if a submission for `key` may proceed now.
    pub fn try_pass(&mut self, key: &str) -> bool {
        self.try_pass_at(key, Instant::now())
    }

    /// Same as [`try_pass`](Self::try_pass) with an explicit clock reading.
    pub fn try_pass_at(&mut self, key: &str, now: Instant) -> bool {
        if let Some(last) = self.last_accepted.get(key) {
            if now.saturating_duration_since(*last) < self.window {
                trace!(key, "Submission dropped by debounce");
                return false;
            }
        }
        self.last_accepted.insert(key.to_string(), now);
        true
    }

    /// Forget a key so the next submission passes immediately.
    pub fn reset(&mut self, key: &str) {
        self.last_accepted.remove(key);
    }
}
