use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;
use crate::jobs::JobId;

/// Identifier wrapper for job applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ApplicationId(pub i64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application status. New applications start out `Pending`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Hired,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Hired)
    }

    /// Forward-only adjacency. Rewriting the current status is always allowed.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;

        if self == next {
            return true;
        }
        match self {
            Pending => matches!(next, Shortlisted | Rejected | Hired),
            Shortlisted => matches!(next, Rejected | Hired),
            Rejected | Hired => false,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub student_id: UserId,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// An application as a recruiter sees it: joined with the applicant's profile summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicantView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: Application,
    pub name: String,
    pub phone: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub cv_filename: Option<String>,
    pub email: String,
}

/// An application as the applying student sees it: joined with the job and company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentApplicationView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: Application,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub salary: Option<i64>,
    pub company_name: String,
}

/// An application together with the recruiter owning its job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationOwnership {
    pub application: Application,
    pub recruiter_id: UserId,
}

/// Payload of a student's application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub cover_letter: Option<String>,
}

/// Payload of a status change. The status stays raw text until the lifecycle validates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: Option<String>,
}
