//! Material upload: form validation and multipart submission.

pub mod controller;
pub mod form;

pub use controller::UploadController;
pub use form::{check_file, format_file_size, split_keywords, UploadForm, ALLOWED_MIME_TYPES, MAX_FILE_BYTES};
