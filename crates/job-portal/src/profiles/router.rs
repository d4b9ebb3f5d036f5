use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;

use super::domain::{RecruiterProfileUpdate, StudentProfileUpdate};
use super::repository::ProfileStore;
use super::service::ProfileService;
use crate::api::{ApiError, ApiResult};
use crate::auth::Identity;

const CV_FIELD: &str = "cv";
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Student profile and CV upload, mounted under `/student`.
pub fn student_profile_routes<S>(service: Arc<ProfileService<S>>) -> Router
where
    S: ProfileStore + 'static,
{
    let body_limit = service.storage().max_bytes() + MULTIPART_OVERHEAD;
    Router::new()
        .route(
            "/profile",
            get(student_profile_handler::<S>).put(update_student_handler::<S>),
        )
        .route(
            "/upload-cv",
            post(upload_cv_handler::<S>).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(service)
}

/// Recruiter profile, mounted under `/recruiter`.
pub fn recruiter_profile_routes<S>(service: Arc<ProfileService<S>>) -> Router
where
    S: ProfileStore + 'static,
{
    Router::new()
        .route(
            "/profile",
            get(recruiter_profile_handler::<S>).put(update_recruiter_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn student_profile_handler<S>(
    State(service): State<Arc<ProfileService<S>>>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse>
where
    S: ProfileStore + 'static,
{
    let profile = service.student(identity.user_id).await?;
    Ok(Json(json!({ "profile": profile })))
}

pub(crate) async fn update_student_handler<S>(
    State(service): State<Arc<ProfileService<S>>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<StudentProfileUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: ProfileStore + 'static,
{
    let Json(update) = payload?;
    let profile = service.update_student(identity.user_id, update).await?;
    Ok(Json(json!({
        "message": "Profile updated successfully",
        "profile": profile,
    })))
}

pub(crate) async fn recruiter_profile_handler<S>(
    State(service): State<Arc<ProfileService<S>>>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse>
where
    S: ProfileStore + 'static,
{
    let profile = service.recruiter(identity.user_id).await?;
    Ok(Json(json!({ "profile": profile })))
}

pub(crate) async fn update_recruiter_handler<S>(
    State(service): State<Arc<ProfileService<S>>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<RecruiterProfileUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: ProfileStore + 'static,
{
    let Json(update) = payload?;
    let profile = service.update_recruiter(identity.user_id, update).await?;
    Ok(Json(json!({
        "message": "Profile updated successfully",
        "profile": profile,
    })))
}

pub(crate) async fn upload_cv_handler<S>(
    State(service): State<Arc<ProfileService<S>>>,
    Extension(identity): Extension<Identity>,
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: ProfileStore + 'static,
{
    let missing = || ApiError::Validation("No CV file provided".to_string());
    let mut multipart = multipart.map_err(|_| missing())?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(CV_FIELD) {
            continue;
        }
        let original_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::Validation("No file selected".to_string()))?;
        let contents = field.bytes().await?;

        let filename = service
            .upload_cv(identity.user_id, &original_name, &contents)
            .await?;
        return Ok(Json(json!({
            "message": "CV uploaded successfully",
            "filename": filename,
        })));
    }

    Err(missing())
}
