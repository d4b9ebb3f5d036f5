//! CV storage on the local filesystem and the public route that serves stored files.

pub mod router;
pub mod storage;

pub use router::upload_routes;
pub use storage::{sanitize_filename, CvStorage, UploadError, ALLOWED_EXTENSIONS};
