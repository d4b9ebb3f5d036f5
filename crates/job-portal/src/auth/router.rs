use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use super::repository::UserStore;
use super::service::{AuthService, LoginRequest, SignupRequest};
use crate::api::ApiResult;

/// `/auth/signup` and `/auth/login`.
pub fn auth_routes<S>(service: Arc<AuthService<S>>) -> Router
where
    S: UserStore + 'static,
{
    Router::new()
        .route("/auth/signup", post(signup_handler::<S>))
        .route("/auth/login", post(login_handler::<S>))
        .with_state(service)
}

pub(crate) async fn signup_handler<S>(
    State(service): State<Arc<AuthService<S>>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: UserStore + 'static,
{
    let Json(request) = payload?;
    let session = service.signup(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub(crate) async fn login_handler<S>(
    State(service): State<Arc<AuthService<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse>
where
    S: UserStore + 'static,
{
    let Json(request) = payload?;
    Ok(Json(service.login(request).await?))
}
