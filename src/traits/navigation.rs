//! Navigation trait abstraction.
//!
//! Stands in for the browser location: controllers write the explore query
//! string through it and move between routes (login redirect, leaving a
//! deleted material).

/// Trait for location updates.
pub trait Navigator: Send + Sync {
    /// Replace the query string of the current location. `query` carries no
    /// leading `?`; an empty string clears it.
    fn replace_query(&self, query: &str);

    /// Navigate to an application route such as `/login`.
    fn navigate(&self, path: &str);
}
