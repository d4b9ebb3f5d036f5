use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use serde_json::json;

use super::domain::{JobId, JobUpdate, NewJob};
use super::query::SearchParams;
use super::repository::JobStore;
use super::service::{JobBoard, SearchPage};
use crate::api::ApiResult;
use crate::auth::Identity;

/// Unauthenticated search and detail endpoints.
pub fn public_job_routes<S>(board: Arc<JobBoard<S>>) -> Router
where
    S: JobStore + 'static,
{
    Router::new()
        .route("/jobs/search", get(search_handler::<S>))
        .route("/jobs/:job_id", get(detail_handler::<S>))
        .with_state(board)
}

/// Posting management, mounted under `/recruiter` behind the recruiter guard.
pub fn recruiter_job_routes<S>(board: Arc<JobBoard<S>>) -> Router
where
    S: JobStore + 'static,
{
    Router::new()
        .route(
            "/jobs",
            get(list_own_handler::<S>).post(create_handler::<S>),
        )
        .route(
            "/jobs/:job_id",
            put(update_handler::<S>).delete(delete_handler::<S>),
        )
        .with_state(board)
}

pub(crate) async fn search_handler<S>(
    State(board): State<Arc<JobBoard<S>>>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<SearchPage>>
where
    S: JobStore + 'static,
{
    let Query(params) = query?;
    Ok(Json(board.search(&params).await?))
}

pub(crate) async fn detail_handler<S>(
    State(board): State<Arc<JobBoard<S>>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: JobStore + 'static,
{
    let Path(job_id) = path?;
    let listing = board.detail(JobId(job_id)).await?;
    Ok(Json(json!({ "job": listing })))
}

pub(crate) async fn create_handler<S>(
    State(board): State<Arc<JobBoard<S>>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: JobStore + 'static,
{
    let Json(job) = payload?;
    let job_id = board.post(identity.user_id, job).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Job posted successfully",
            "job_id": job_id,
        })),
    ))
}

pub(crate) async fn list_own_handler<S>(
    State(board): State<Arc<JobBoard<S>>>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse>
where
    S: JobStore + 'static,
{
    let jobs = board.postings_of(identity.user_id).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

pub(crate) async fn update_handler<S>(
    State(board): State<Arc<JobBoard<S>>>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: JobStore + 'static,
{
    let Path(job_id) = path?;
    let Json(update) = payload?;
    board.update(identity.user_id, JobId(job_id), update).await?;
    Ok(Json(json!({ "message": "Job updated successfully" })))
}

pub(crate) async fn delete_handler<S>(
    State(board): State<Arc<JobBoard<S>>>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: JobStore + 'static,
{
    let Path(job_id) = path?;
    board.remove(identity.user_id, JobId(job_id)).await?;
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}
