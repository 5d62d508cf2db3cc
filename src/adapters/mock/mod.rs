//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses
//! - [`InMemoryStorage`] - In-memory session storage
//! - [`RecordingNavigator`] - Records location changes

pub mod http;
pub mod navigator;
pub mod storage;

pub use http::{MockHttpClient, MockResponse};
pub use navigator::{NavigationEvent, RecordingNavigator};
pub use storage::InMemoryStorage;
