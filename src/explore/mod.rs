//! Resource explorer: filter state, query-string codec, curated sections and
//! the controller that ties them to the API.

pub mod controller;
pub mod filters;
pub mod query;
pub mod sections;

pub use controller::{ExploreController, FetchRequest, FetchTicket};
pub use filters::{DateRange, FilterState, SortBy, Tab, ViewMode, DEFAULT_PAGE_SIZE};
pub use sections::{CuratedSections, Section, SECTION_SIZE};
