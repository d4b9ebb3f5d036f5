//! Job postings: the search query builder, public lookups and recruiter-owned management.

pub mod domain;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Job, JobDraft, JobId, JobListing, JobUpdate, NewJob, RecruiterJob};
pub use query::{
    JobSearch, Page, SearchFilters, SearchParams, SortField, SortOrder, DEFAULT_PER_PAGE,
    MAX_PER_PAGE,
};
pub use repository::JobStore;
pub use router::{public_job_routes, recruiter_job_routes};
pub use service::{JobBoard, JobBoardError, Pagination, SearchPage};
