//! Result type alias for portal operations.

use super::portal_error::PortalError;

/// Type alias for Results using PortalError.
pub type PortalResult<T> = Result<T, PortalError>;
