use async_trait::async_trait;

use super::domain::{JobDraft, JobId, JobListing, JobUpdate, RecruiterJob};
use super::query::JobSearch;
use crate::auth::UserId;
use crate::storage::RepositoryError;

/// Job posting storage. Lookups only ever return active postings.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_job(&self, recruiter: UserId, draft: JobDraft)
        -> Result<JobId, RepositoryError>;

    async fn find_active_job(&self, id: JobId) -> Result<Option<JobListing>, RepositoryError>;

    async fn search_jobs(&self, search: &JobSearch) -> Result<Vec<JobListing>, RepositoryError>;

    /// All postings of a recruiter, soft-deleted ones included, newest first.
    async fn jobs_for_recruiter(
        &self,
        recruiter: UserId,
    ) -> Result<Vec<RecruiterJob>, RepositoryError>;

    /// Returns false when no row changed.
    async fn update_job(&self, id: JobId, update: &JobUpdate) -> Result<bool, RepositoryError>;

    /// Soft delete scoped to the owner. Returns false when no row changed.
    async fn deactivate_job(&self, id: JobId, recruiter: UserId) -> Result<bool, RepositoryError>;
}
