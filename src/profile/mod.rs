//! User profiles: viewing, following, settings and cover image.

pub mod controller;
pub mod settings;

pub use controller::{MaterialList, ProfileController, PROFILE_PAGE_SIZE};
pub use settings::{SettingsForm, SettingsSubmission};
