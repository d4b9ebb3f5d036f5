use std::sync::Arc;

use axum::Router;

use crate::applications::{
    recruiter_application_routes, student_application_routes, ApplicationLifecycle, StatusPolicy,
};
use crate::auth::{auth_routes, guard, AuthService, Role, TokenService};
use crate::config::AppConfig;
use crate::jobs::{public_job_routes, recruiter_job_routes, JobBoard};
use crate::profiles::{recruiter_profile_routes, student_profile_routes, ProfileService};
use crate::storage::PortalStore;
use crate::uploads::{upload_routes, CvStorage};

/// Every portal service wired to one store.
pub struct Portal<S> {
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthService<S>>,
    pub jobs: Arc<JobBoard<S>>,
    pub applications: Arc<ApplicationLifecycle<S>>,
    pub profiles: Arc<ProfileService<S>>,
    pub uploads: Arc<CvStorage>,
}

impl<S> Portal<S>
where
    S: PortalStore + 'static,
{
    pub fn new(
        store: Arc<S>,
        tokens: Arc<TokenService>,
        uploads: Arc<CvStorage>,
        policy: StatusPolicy,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(store.clone(), tokens.clone())),
            jobs: Arc::new(JobBoard::new(store.clone())),
            applications: Arc::new(ApplicationLifecycle::new(store.clone(), policy)),
            profiles: Arc::new(ProfileService::new(store, uploads.clone())),
            tokens,
            uploads,
        }
    }

    pub fn from_config(store: Arc<S>, config: &AppConfig) -> Self {
        Self::new(
            store,
            Arc::new(TokenService::new(&config.auth.secret)),
            Arc::new(CvStorage::from_config(&config.uploads)),
            StatusPolicy::from(&config.applications),
        )
    }

    /// Public auth, search and upload routes, plus the role-guarded `/recruiter` and `/student`
    /// trees.
    pub fn router(&self) -> Router {
        let recruiter = recruiter_job_routes(self.jobs.clone())
            .merge(recruiter_application_routes(self.applications.clone()))
            .merge(recruiter_profile_routes(self.profiles.clone()));
        let student = student_application_routes(self.applications.clone())
            .merge(student_profile_routes(self.profiles.clone()));

        Router::new()
            .merge(auth_routes(self.auth.clone()))
            .merge(public_job_routes(self.jobs.clone()))
            .merge(upload_routes(self.uploads.clone()))
            .nest(
                "/recruiter",
                guard(recruiter, self.tokens.clone(), Role::Recruiter),
            )
            .nest("/student", guard(student, self.tokens.clone(), Role::Student))
    }
}
