//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileTokenStorage`] - JSON file session storage
//! - [`LogNavigator`] - In-memory location that logs every change
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted HTTP responses with request recording
//! - [`mock::InMemoryStorage`] - In-memory session storage
//! - [`mock::RecordingNavigator`] - Records every location change

pub mod file_storage;
pub mod log_navigator;
pub mod mock;
pub mod reqwest_http;

pub use file_storage::FileTokenStorage;
pub use log_navigator::LogNavigator;
pub use mock::{InMemoryStorage, MockHttpClient, RecordingNavigator};
pub use reqwest_http::ReqwestHttpClient;
