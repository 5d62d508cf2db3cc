//! Recording navigator for testing.

use std::sync::{Arc, Mutex};

use crate::traits::Navigator;

/// One recorded location change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Query(String),
    Route(String),
}

/// Navigator that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    events: Arc<Mutex<Vec<NavigationEvent>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The most recently written query string.
    pub fn last_query(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            NavigationEvent::Query(q) => Some(q),
            NavigationEvent::Route(_) => None,
        })
    }

    /// Every route navigated to, in order.
    pub fn routes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                NavigationEvent::Route(r) => Some(r),
                NavigationEvent::Query(_) => None,
            })
            .collect()
    }
}

impl Navigator for RecordingNavigator {
    fn replace_query(&self, query: &str) {
        self.events
            .lock()
            .unwrap()
            .push(NavigationEvent::Query(query.to_string()));
    }

    fn navigate(&self, path: &str) {
        self.events
            .lock()
            .unwrap()
            .push(NavigationEvent::Route(path.to_string()));
    }
}
