//! Application lifecycle: one application per student and job, recruiter-owned triage through
//! status changes governed by a [`StatusPolicy`].

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantView, Application, ApplicationId, ApplicationOwnership, ApplicationStatus,
    ApplyRequest, StatusChange, StudentApplicationView, UnknownStatus,
};
pub use repository::{ApplicationStore, ApplyOutcome};
pub use router::{recruiter_application_routes, student_application_routes};
pub use service::{ApplicationError, ApplicationLifecycle, StatusPolicy};
