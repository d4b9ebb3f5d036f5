use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct JobId(pub i64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A posting as stored. Inactive postings are soft-deleted and never surface in reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: JobId,
    pub recruiter_id: UserId,
    pub title: String,
    pub description: String,
    pub skills_required: Option<String>,
    pub location: Option<String>,
    pub salary: Option<i64>,
    pub work_mode: Option<String>,
    pub job_type: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub posted_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A posting joined with the owning recruiter's public company fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub job: Job,
    pub company_name: String,
    pub company_description: Option<String>,
}

/// A recruiter's own posting with the number of applications received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecruiterJob {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub job: Job,
    pub application_count: i64,
}

/// Payload for a new posting. Title and description are mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills_required: Option<String>,
    pub location: Option<String>,
    pub salary: Option<i64>,
    pub work_mode: Option<String>,
    pub job_type: Option<String>,
    pub deadline: Option<NaiveDate>,
}

/// Validated form of [`NewJob`] handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub skills_required: Option<String>,
    pub location: Option<String>,
    pub salary: Option<i64>,
    pub work_mode: Option<String>,
    pub job_type: Option<String>,
    pub deadline: Option<NaiveDate>,
}

/// Partial update: one optional per mutable column, absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills_required: Option<String>,
    pub location: Option<String>,
    pub salary: Option<i64>,
    pub work_mode: Option<String>,
    pub job_type: Option<String>,
    pub deadline: Option<NaiveDate>,
}

impl JobUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.skills_required.is_none()
            && self.location.is_none()
            && self.salary.is_none()
            && self.work_mode.is_none()
            && self.job_type.is_none()
            && self.deadline.is_none()
    }
}
