//! Transient user notices.
//!
//! Controllers report the outcome of user actions here instead of returning
//! errors. Every notice is also logged. The CLI drains the queue and prints
//! it; tests inspect it.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Shared notice queue. Clones push to the same queue.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    queue: Arc<Mutex<Vec<Notice>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    fn push(&self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Error => tracing::warn!(level = level.as_str(), "{}", message),
            _ => tracing::info!(level = level.as_str(), "{}", message),
        }
        if let Ok(mut queue) = self.queue.lock() {
            queue.push(Notice { level, message });
        }
    }

    /// Take every pending notice.
    pub fn drain(&self) -> Vec<Notice> {
        self.queue
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }

    /// Pending notices, left in place.
    pub fn pending(&self) -> Vec<Notice> {
        self.queue.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notice> {
        self.queue.lock().ok().and_then(|q| q.last().cloned())
    }

    /// Whether any pending notice carries exactly `message`.
    pub fn contains(&self, message: &str) -> bool {
        self.pending().iter().any(|n| n.message == message)
    }
}
