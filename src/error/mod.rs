//! Unified error handling for the portal client.
//!
//! | Category | Description | Surfaces as |
//! |----------|-------------|-------------|
//! | Network | Connection, timeout | Toast |
//! | Server | Non-2xx other than 401/403 | Toast with server message |
//! | Auth | 401/403, refresh failure | Redirect to login |
//! | User | Client-side validation | Inline field error |
//! | System | Session storage | Toast |
//! | Configuration | Environment | Startup failure |

mod auth;
mod category;
mod network;
mod portal_error;
mod result;
mod storage;
mod validation;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use network::{extract_server_message, NetworkError, GENERIC_SERVER_MESSAGE};
pub use portal_error::PortalError;
pub use result::PortalResult;
pub use storage::StorageError;
pub use validation::ValidationError;
