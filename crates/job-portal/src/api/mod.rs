//! HTTP boundary: the shared error type and the composed portal router.

pub mod error;
pub mod router;

pub use error::{ApiError, ApiResult};
pub use router::Portal;
