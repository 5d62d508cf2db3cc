//! Session storage and the auth session controller.
//!
//! - [`SessionStore`] - access/refresh tokens and the cached user
//! - [`AuthController`] - login, register, logout and bootstrap flows
//! - [`forms`] - client-side validation for the auth forms

pub mod controller;
pub mod forms;
pub mod session;

pub use controller::{AuthController, AuthState};
pub use forms::{check_image, LoginForm, RegisterForm, MAX_IMAGE_BYTES};
pub use session::{Session, SessionStore};
