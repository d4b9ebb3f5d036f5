use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::applications::domain::{
    ApplicantView, Application, ApplicationId, ApplicationOwnership, ApplicationStatus,
    StudentApplicationView,
};
use crate::applications::repository::{ApplicationStore, ApplyOutcome};
use crate::applications::{ApplicationLifecycle, StatusPolicy};
use crate::auth::UserId;
use crate::jobs::{Job, JobDraft, JobId, JobListing, JobSearch, JobStore, JobUpdate, RecruiterJob};
use crate::storage::RepositoryError;

pub(super) const RECRUITER: UserId = UserId(1);
pub(super) const OTHER_RECRUITER: UserId = UserId(2);
pub(super) const STUDENT: UserId = UserId(10);
pub(super) const OTHER_STUDENT: UserId = UserId(11);

#[derive(Default)]
struct MemoryState {
    jobs: Vec<Job>,
    applications: Vec<Application>,
    stale_status: Option<ApplicationStatus>,
}

/// Job and application store kept in a mutex, enough to drive the lifecycle rules.
#[derive(Default)]
pub(super) struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub(super) fn with_job(recruiter: UserId, title: &str) -> (Arc<Self>, JobId) {
        let store = Arc::new(Self::default());
        let id = store.add_job(recruiter, title);
        (store, id)
    }

    pub(super) fn add_job(&self, recruiter: UserId, title: &str) -> JobId {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let id = JobId(state.jobs.len() as i64 + 1);
        state.jobs.push(Job {
            id,
            recruiter_id: recruiter,
            title: title.to_string(),
            description: format!("{title} role"),
            skills_required: None,
            location: Some("Remote".to_string()),
            salary: Some(50_000),
            work_mode: None,
            job_type: None,
            deadline: None,
            posted_at: Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).single().expect("valid"),
            is_active: true,
        });
        id
    }

    pub(super) fn close_job(&self, id: JobId) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if let Some(job) = state.jobs.iter_mut().find(|job| job.id == id) {
            job.is_active = false;
        }
    }

    /// The next ownership lookup reports `status` instead of the stored one, as if another
    /// request changed the row right after it was read.
    pub(super) fn report_stale_status_once(&self, status: ApplicationStatus) {
        self.state.lock().expect("store mutex poisoned").stale_status = Some(status);
    }

    pub(super) fn application_count(&self) -> usize {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .applications
            .len()
    }

    fn listing(job: &Job) -> JobListing {
        JobListing {
            job: job.clone(),
            company_name: format!("Company {}", job.recruiter_id),
            company_description: None,
        }
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(
        &self,
        recruiter: UserId,
        draft: JobDraft,
    ) -> Result<JobId, RepositoryError> {
        Ok(self.add_job(recruiter, &draft.title))
    }

    async fn find_active_job(&self, id: JobId) -> Result<Option<JobListing>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .jobs
            .iter()
            .find(|job| job.id == id && job.is_active)
            .map(Self::listing))
    }

    async fn search_jobs(&self, _search: &JobSearch) -> Result<Vec<JobListing>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .jobs
            .iter()
            .filter(|job| job.is_active)
            .map(Self::listing)
            .collect())
    }

    async fn jobs_for_recruiter(
        &self,
        recruiter: UserId,
    ) -> Result<Vec<RecruiterJob>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .jobs
            .iter()
            .filter(|job| job.recruiter_id == recruiter)
            .map(|job| RecruiterJob {
                job: job.clone(),
                application_count: state
                    .applications
                    .iter()
                    .filter(|application| application.job_id == job.id)
                    .count() as i64,
            })
            .collect())
    }

    async fn update_job(&self, id: JobId, update: &JobUpdate) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let Some(job) = state.jobs.iter_mut().find(|job| job.id == id) else {
            return Ok(false);
        };
        if let Some(title) = &update.title {
            job.title = title.clone();
        }
        Ok(true)
    }

    async fn deactivate_job(&self, id: JobId, recruiter: UserId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        match state
            .jobs
            .iter_mut()
            .find(|job| job.id == id && job.recruiter_id == recruiter)
        {
            Some(job) => {
                job.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert_application(
        &self,
        job: JobId,
        student: UserId,
        cover_letter: Option<String>,
    ) -> Result<ApplyOutcome, RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if !state.jobs.iter().any(|row| row.id == job && row.is_active) {
            return Ok(ApplyOutcome::JobUnavailable);
        }
        if state
            .applications
            .iter()
            .any(|row| row.job_id == job && row.student_id == student)
        {
            return Ok(ApplyOutcome::Duplicate);
        }

        let id = ApplicationId(state.applications.len() as i64 + 1);
        state.applications.push(Application {
            id,
            job_id: job,
            student_id: student,
            cover_letter,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
        });
        Ok(ApplyOutcome::Created(id))
    }

    async fn applications_for_job(
        &self,
        job: JobId,
    ) -> Result<Vec<ApplicantView>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .applications
            .iter()
            .rev()
            .filter(|row| row.job_id == job)
            .map(|row| ApplicantView {
                application: row.clone(),
                name: format!("Student {}", row.student_id),
                phone: None,
                education: None,
                skills: None,
                cv_filename: None,
                email: format!("student{}@example.com", row.student_id),
            })
            .collect())
    }

    async fn applications_for_student(
        &self,
        student: UserId,
    ) -> Result<Vec<StudentApplicationView>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .applications
            .iter()
            .rev()
            .filter(|row| row.student_id == student)
            .filter_map(|row| {
                let job = state.jobs.iter().find(|job| job.id == row.job_id)?;
                Some(StudentApplicationView {
                    application: row.clone(),
                    title: job.title.clone(),
                    description: job.description.clone(),
                    location: job.location.clone(),
                    salary: job.salary,
                    company_name: format!("Company {}", job.recruiter_id),
                })
            })
            .collect())
    }

    async fn find_application_with_owner(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationOwnership>, RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let stale = state.stale_status.take();
        Ok(state
            .applications
            .iter()
            .find(|row| row.id == id)
            .and_then(|row| {
                let job = state.jobs.iter().find(|job| job.id == row.job_id)?;
                let mut application = row.clone();
                if let Some(status) = stale {
                    application.status = status;
                }
                Some(ApplicationOwnership {
                    application,
                    recruiter_id: job.recruiter_id,
                })
            }))
    }

    async fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        expected: Option<ApplicationStatus>,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        match state
            .applications
            .iter_mut()
            .find(|row| row.id == id && expected.map_or(true, |status| row.status == status))
        {
            Some(row) => {
                row.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Finds every job but loses every insert race on the unique index.
pub(super) struct ConflictStore(pub(super) MemoryStore);

#[async_trait]
impl JobStore for ConflictStore {
    async fn insert_job(
        &self,
        recruiter: UserId,
        draft: JobDraft,
    ) -> Result<JobId, RepositoryError> {
        self.0.insert_job(recruiter, draft).await
    }

    async fn find_active_job(&self, id: JobId) -> Result<Option<JobListing>, RepositoryError> {
        self.0.find_active_job(id).await
    }

    async fn search_jobs(&self, search: &JobSearch) -> Result<Vec<JobListing>, RepositoryError> {
        self.0.search_jobs(search).await
    }

    async fn jobs_for_recruiter(
        &self,
        recruiter: UserId,
    ) -> Result<Vec<RecruiterJob>, RepositoryError> {
        self.0.jobs_for_recruiter(recruiter).await
    }

    async fn update_job(&self, id: JobId, update: &JobUpdate) -> Result<bool, RepositoryError> {
        self.0.update_job(id, update).await
    }

    async fn deactivate_job(&self, id: JobId, recruiter: UserId) -> Result<bool, RepositoryError> {
        self.0.deactivate_job(id, recruiter).await
    }
}

#[async_trait]
impl ApplicationStore for ConflictStore {
    async fn insert_application(
        &self,
        _job: JobId,
        _student: UserId,
        _cover_letter: Option<String>,
    ) -> Result<ApplyOutcome, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    async fn applications_for_job(
        &self,
        job: JobId,
    ) -> Result<Vec<ApplicantView>, RepositoryError> {
        self.0.applications_for_job(job).await
    }

    async fn applications_for_student(
        &self,
        student: UserId,
    ) -> Result<Vec<StudentApplicationView>, RepositoryError> {
        self.0.applications_for_student(student).await
    }

    async fn find_application_with_owner(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationOwnership>, RepositoryError> {
        self.0.find_application_with_owner(id).await
    }

    async fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        expected: Option<ApplicationStatus>,
    ) -> Result<bool, RepositoryError> {
        self.0.set_application_status(id, status, expected).await
    }
}

pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

#[async_trait]
impl JobStore for UnavailableStore {
    async fn insert_job(&self, _: UserId, _: JobDraft) -> Result<JobId, RepositoryError> {
        offline()
    }

    async fn find_active_job(&self, _: JobId) -> Result<Option<JobListing>, RepositoryError> {
        offline()
    }

    async fn search_jobs(&self, _: &JobSearch) -> Result<Vec<JobListing>, RepositoryError> {
        offline()
    }

    async fn jobs_for_recruiter(&self, _: UserId) -> Result<Vec<RecruiterJob>, RepositoryError> {
        offline()
    }

    async fn update_job(&self, _: JobId, _: &JobUpdate) -> Result<bool, RepositoryError> {
        offline()
    }

    async fn deactivate_job(&self, _: JobId, _: UserId) -> Result<bool, RepositoryError> {
        offline()
    }
}

#[async_trait]
impl ApplicationStore for UnavailableStore {
    async fn insert_application(
        &self,
        _: JobId,
        _: UserId,
        _: Option<String>,
    ) -> Result<ApplyOutcome, RepositoryError> {
        offline()
    }

    async fn applications_for_job(&self, _: JobId) -> Result<Vec<ApplicantView>, RepositoryError> {
        offline()
    }

    async fn applications_for_student(
        &self,
        _: UserId,
    ) -> Result<Vec<StudentApplicationView>, RepositoryError> {
        offline()
    }

    async fn find_application_with_owner(
        &self,
        _: ApplicationId,
    ) -> Result<Option<ApplicationOwnership>, RepositoryError> {
        offline()
    }

    async fn set_application_status(
        &self,
        _: ApplicationId,
        _: ApplicationStatus,
        _: Option<ApplicationStatus>,
    ) -> Result<bool, RepositoryError> {
        offline()
    }
}

pub(super) fn lifecycle<S>(store: Arc<S>) -> Arc<ApplicationLifecycle<S>>
where
    S: JobStore + ApplicationStore + 'static,
{
    Arc::new(ApplicationLifecycle::new(store, StatusPolicy::standard()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
