//! Portal API client and typed endpoint groups.
//!
//! [`ApiClient`] owns the transport, the bearer token and the refresh-once
//! policy. The groups below only build calls and decode bodies.

pub mod auth;
pub mod client;
pub mod materials;
pub mod users;

pub use auth::AuthApi;
pub use client::{decode, decode_flag, ApiCall, ApiClient, AuthPolicy};
pub use materials::{MaterialQuery, MaterialsApi};
pub use users::UsersApi;
