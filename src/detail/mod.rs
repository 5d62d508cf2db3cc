//! Material detail view state.

pub mod controller;

pub use controller::{
    estimated_average, DetailController, RatingTicket, COMMENTS_PAGE_SIZE, DELETED, RATE_FAILED,
    RATE_OK, RELATED_COUNT,
};
