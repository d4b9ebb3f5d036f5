use async_trait::async_trait;

use super::domain::{
    ApplicantView, ApplicationId, ApplicationOwnership, ApplicationStatus, StudentApplicationView,
};
use crate::auth::UserId;
use crate::jobs::JobId;
use crate::storage::RepositoryError;

/// Outcome of an insert attempt, decided inside the same transaction as the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created(ApplicationId),
    Duplicate,
    JobUnavailable,
}

/// Application storage. Implementations must keep at most one application per
/// (job, student) pair even under concurrent inserts.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert_application(
        &self,
        job: JobId,
        student: UserId,
        cover_letter: Option<String>,
    ) -> Result<ApplyOutcome, RepositoryError>;

    /// Newest first.
    async fn applications_for_job(&self, job: JobId)
        -> Result<Vec<ApplicantView>, RepositoryError>;

    /// Newest first.
    async fn applications_for_student(
        &self,
        student: UserId,
    ) -> Result<Vec<StudentApplicationView>, RepositoryError>;

    async fn find_application_with_owner(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationOwnership>, RepositoryError>;

    /// Returns false when no row changed. With `expected` set, only a row still in that status
    /// is updated, as one conditional write.
    async fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        expected: Option<ApplicationStatus>,
    ) -> Result<bool, RepositoryError>;
}
