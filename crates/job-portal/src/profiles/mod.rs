//! Student and recruiter profiles, created at signup and edited through partial updates.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{RecruiterProfile, RecruiterProfileUpdate, StudentProfile, StudentProfileUpdate};
pub use repository::ProfileStore;
pub use router::{recruiter_profile_routes, student_profile_routes};
pub use service::{ProfileError, ProfileService};
