use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde_json::json;

use super::domain::{ApplicationId, ApplyRequest, StatusChange};
use super::repository::ApplicationStore;
use super::service::ApplicationLifecycle;
use crate::api::{ApiError, ApiResult};
use crate::auth::Identity;
use crate::jobs::{JobId, JobStore};

/// Recruiter triage endpoints, mounted under `/recruiter`.
pub fn recruiter_application_routes<S>(lifecycle: Arc<ApplicationLifecycle<S>>) -> Router
where
    S: JobStore + ApplicationStore + 'static,
{
    Router::new()
        .route("/jobs/:job_id/applications", get(job_applications_handler::<S>))
        .route(
            "/applications/:application_id/status",
            put(status_handler::<S>),
        )
        .with_state(lifecycle)
}

/// Student endpoints, mounted under `/student`.
pub fn student_application_routes<S>(lifecycle: Arc<ApplicationLifecycle<S>>) -> Router
where
    S: JobStore + ApplicationStore + 'static,
{
    Router::new()
        .route("/jobs/apply/:job_id", post(apply_handler::<S>))
        .route("/applications", get(student_applications_handler::<S>))
        .with_state(lifecycle)
}

pub(crate) async fn apply_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: JobStore + ApplicationStore + 'static,
{
    let Path(job_id) = path?;
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => ApplyRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };

    // An omitted cover letter is stored as empty text, not NULL.
    let cover_letter = request.cover_letter.unwrap_or_default();
    let application_id = lifecycle
        .apply(JobId(job_id), identity.user_id, Some(cover_letter))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Application submitted successfully",
            "application_id": application_id,
        })),
    ))
}

pub(crate) async fn student_applications_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse>
where
    S: JobStore + ApplicationStore + 'static,
{
    let applications = lifecycle.list_for_student(identity.user_id).await?;
    Ok(Json(json!({ "applications": applications })))
}

pub(crate) async fn job_applications_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: JobStore + ApplicationStore + 'static,
{
    let Path(job_id) = path?;
    let applications = lifecycle
        .list_for_job(JobId(job_id), identity.user_id)
        .await?;
    Ok(Json(json!({ "applications": applications })))
}

pub(crate) async fn status_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StatusChange>, JsonRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: JobStore + ApplicationStore + 'static,
{
    let Path(application_id) = path?;
    let Json(change) = payload?;
    let status = change
        .status
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Status is required".to_string()))?;

    let status = lifecycle
        .set_status(ApplicationId(application_id), &status, identity.user_id)
        .await?;

    Ok(Json(json!({
        "message": "Application status updated successfully",
        "status": status,
    })))
}
