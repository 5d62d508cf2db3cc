//! Optimistic updates with rollback.
//!
//! Snapshot the state, apply a speculative change, and restore the snapshot
//! if the remote commit fails. The update is a value, so it can be carried
//! across an await that does not borrow the state.
//!
//! ```ignore
//! let update = OptimisticUpdate::apply(&mut material, |m| m.total_ratings += 1);
//! match api.rate(&id, 5).await {
//!     Ok(_) => update.commit(),
//!     Err(_) => update.rollback(&mut material),
//! }
//! ```

use tracing::debug;

/// An applied speculative change that has not been settled yet.
#[must_use = "an optimistic update must be committed or rolled back"]
#[derive(Debug)]
pub struct OptimisticUpdate<S> {
    snapshot: S,
}

impl<S: Clone> OptimisticUpdate<S> {
    /// Snapshot `state`, then apply `speculate` to it.
    pub fn apply(state: &mut S, speculate: impl FnOnce(&mut S)) -> Self {
        let snapshot = state.clone();
        speculate(state);
        Self { snapshot }
    }

    /// State as it was before the speculative change.
    pub fn snapshot(&self) -> &S {
        &self.snapshot
    }

    /// Keep the speculative state.
    pub fn commit(self) {}

    /// Restore the pre-change state.
    pub fn rollback(self, state: &mut S) {
        debug!("Rolling back optimistic update");
        *state = self.snapshot;
    }
}
