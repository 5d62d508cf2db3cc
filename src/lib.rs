//! Portal - client for the academic material sharing portal.
//!
//! The library holds the session, API client and per-view controllers;
//! the `portal` binary is a thin command-line driver over it.

pub mod adapters;
pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod detail;
pub mod error;
pub mod explore;
pub mod models;
pub mod notifications;
pub mod optimistic;
pub mod profile;
pub mod traits;
pub mod upload;

pub use error::{PortalError, PortalResult};
