use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{
    ApplicantView, ApplicationId, ApplicationStatus, StudentApplicationView,
};
use super::repository::{ApplicationStore, ApplyOutcome};
use crate::auth::UserId;
use crate::config::ApplicationConfig;
use crate::jobs::{JobId, JobStore};
use crate::storage::RepositoryError;

/// Hardening switches applied to recruiter status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    pub enforce_ownership: bool,
    pub restrict_transitions: bool,
}

impl StatusPolicy {
    /// Ownership is checked; any status may overwrite any other.
    pub const fn standard() -> Self {
        Self {
            enforce_ownership: true,
            restrict_transitions: false,
        }
    }

    /// Ownership is checked and only forward transitions are accepted.
    pub const fn strict() -> Self {
        Self {
            enforce_ownership: true,
            restrict_transitions: true,
        }
    }
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<&ApplicationConfig> for StatusPolicy {
    fn from(config: &ApplicationConfig) -> Self {
        Self {
            enforce_ownership: config.enforce_ownership,
            restrict_transitions: config.restrict_transitions,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("Job not found")]
    JobNotFound,
    #[error("You have already applied to this job")]
    DuplicateApplication,
    #[error("Access denied")]
    NotOwner,
    #[error("Invalid status")]
    InvalidStatus(String),
    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("Application not found")]
    ApplicationNotFound,
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict => ApplicationError::DuplicateApplication,
            other => ApplicationError::Repository(other),
        }
    }
}

/// Application creation, listing and recruiter-driven status changes.
pub struct ApplicationLifecycle<S> {
    store: Arc<S>,
    policy: StatusPolicy,
}

impl<S> ApplicationLifecycle<S>
where
    S: JobStore + ApplicationStore + 'static,
{
    pub fn new(store: Arc<S>, policy: StatusPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    pub async fn apply(
        &self,
        job: JobId,
        student: UserId,
        cover_letter: Option<String>,
    ) -> Result<ApplicationId, ApplicationError> {
        if self.store.find_active_job(job).await?.is_none() {
            return Err(ApplicationError::JobNotFound);
        }

        match self
            .store
            .insert_application(job, student, cover_letter)
            .await?
        {
            ApplyOutcome::Created(id) => {
                info!(application_id = %id, job_id = %job, student_id = %student, "application submitted");
                Ok(id)
            }
            ApplyOutcome::Duplicate => Err(ApplicationError::DuplicateApplication),
            ApplyOutcome::JobUnavailable => Err(ApplicationError::JobNotFound),
        }
    }

    pub async fn list_for_job(
        &self,
        job: JobId,
        requester: UserId,
    ) -> Result<Vec<ApplicantView>, ApplicationError> {
        let listing = self
            .store
            .find_active_job(job)
            .await?
            .ok_or(ApplicationError::JobNotFound)?;
        if listing.job.recruiter_id != requester {
            warn!(job_id = %job, requester = %requester, "applications requested for a foreign job");
            return Err(ApplicationError::NotOwner);
        }

        Ok(self.store.applications_for_job(job).await?)
    }

    pub async fn list_for_student(
        &self,
        student: UserId,
    ) -> Result<Vec<StudentApplicationView>, ApplicationError> {
        Ok(self.store.applications_for_student(student).await?)
    }

    pub async fn set_status(
        &self,
        id: ApplicationId,
        status: &str,
        recruiter: UserId,
    ) -> Result<ApplicationStatus, ApplicationError> {
        let next: ApplicationStatus = status
            .trim()
            .parse()
            .map_err(|_| ApplicationError::InvalidStatus(status.to_string()))?;

        // With restricted transitions the write is conditional on the status the check saw, and a
        // concurrent change re-runs the check. Statuses only move forward, so this terminates.
        let previous = loop {
            let current = self
                .store
                .find_application_with_owner(id)
                .await?
                .ok_or(ApplicationError::ApplicationNotFound)?;

            if self.policy.enforce_ownership && current.recruiter_id != recruiter {
                warn!(application_id = %id, recruiter = %recruiter, "status change on a foreign application");
                return Err(ApplicationError::NotOwner);
            }

            let previous = current.application.status;
            let expected = if self.policy.restrict_transitions {
                if !previous.can_transition_to(next) {
                    return Err(ApplicationError::InvalidTransition {
                        from: previous,
                        to: next,
                    });
                }
                Some(previous)
            } else {
                None
            };

            if self.store.set_application_status(id, next, expected).await? {
                break previous;
            }
            if expected.is_none() {
                return Err(ApplicationError::ApplicationNotFound);
            }
            debug!(application_id = %id, "status changed concurrently, re-checking");
        };

        info!(application_id = %id, from = %previous, to = %next, "application status updated");
        Ok(next)
    }
}
