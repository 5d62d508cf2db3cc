//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Sends one HTTP request
//! - [`TokenStorage`] - Durable session storage
//! - [`Navigator`] - Location updates (query string, route changes)

pub mod http;
pub mod navigation;
pub mod storage;

pub use http::{
    Headers, HttpClient, HttpError, HttpRequest, Method, MultipartPart, RequestBody, Response,
};
pub use navigation::Navigator;
pub use storage::{TokenStorage, REFRESH_TOKEN_KEY, TOKEN_KEY, USER_KEY};
