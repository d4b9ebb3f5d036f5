use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::domain::{JobDraft, JobId, JobListing, JobUpdate, NewJob, RecruiterJob};
use super::query::{JobSearch, SearchParams};
use super::repository::JobStore;
use crate::auth::UserId;
use crate::storage::RepositoryError;

/// One page of search results. `total` counts the returned page only.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub jobs: Vec<JobListing>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum JobBoardError {
    #[error("{0}")]
    Validation(String),
    #[error("Job not found")]
    NotFound,
    #[error("Job not found or access denied")]
    AccessDenied,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Public search plus recruiter-side posting management.
pub struct JobBoard<S> {
    store: Arc<S>,
}

impl<S> JobBoard<S>
where
    S: JobStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn search(&self, params: &SearchParams) -> Result<SearchPage, JobBoardError> {
        let search = JobSearch::from_params(params);
        let jobs = self.store.search_jobs(&search).await?;

        Ok(SearchPage {
            pagination: Pagination {
                page: search.page.number,
                per_page: search.page.per_page,
                total: jobs.len(),
            },
            jobs,
        })
    }

    pub async fn detail(&self, id: JobId) -> Result<JobListing, JobBoardError> {
        self.store
            .find_active_job(id)
            .await?
            .ok_or(JobBoardError::NotFound)
    }

    pub async fn post(&self, recruiter: UserId, job: NewJob) -> Result<JobId, JobBoardError> {
        let draft = JobDraft {
            title: required(job.title, "title")?,
            description: required(job.description, "description")?,
            skills_required: job.skills_required,
            location: job.location,
            salary: job.salary,
            work_mode: job.work_mode,
            job_type: job.job_type,
            deadline: job.deadline,
        };

        let id = self.store.insert_job(recruiter, draft).await?;
        info!(job_id = %id, recruiter_id = %recruiter, "job posted");
        Ok(id)
    }

    pub async fn postings_of(&self, recruiter: UserId) -> Result<Vec<RecruiterJob>, JobBoardError> {
        Ok(self.store.jobs_for_recruiter(recruiter).await?)
    }

    pub async fn update(
        &self,
        recruiter: UserId,
        id: JobId,
        update: JobUpdate,
    ) -> Result<(), JobBoardError> {
        self.owned_active_job(recruiter, id).await?;
        if update.is_empty() {
            return Err(JobBoardError::Validation(
                "No valid fields to update".to_string(),
            ));
        }

        if !self.store.update_job(id, &update).await? {
            return Err(JobBoardError::AccessDenied);
        }
        Ok(())
    }

    pub async fn remove(&self, recruiter: UserId, id: JobId) -> Result<(), JobBoardError> {
        self.owned_active_job(recruiter, id).await?;
        if !self.store.deactivate_job(id, recruiter).await? {
            return Err(JobBoardError::AccessDenied);
        }
        info!(job_id = %id, recruiter_id = %recruiter, "job deactivated");
        Ok(())
    }

    async fn owned_active_job(
        &self,
        recruiter: UserId,
        id: JobId,
    ) -> Result<JobListing, JobBoardError> {
        match self.store.find_active_job(id).await? {
            Some(listing) if listing.job.recruiter_id == recruiter => Ok(listing),
            _ => Err(JobBoardError::AccessDenied),
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, JobBoardError> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| JobBoardError::Validation(format!("{field} is required")))
}
