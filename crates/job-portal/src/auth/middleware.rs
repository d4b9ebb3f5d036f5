//! Access middleware: an authentication gate that resolves the bearer token into an
//! [`Identity`] stored in the request extensions, and an authorization gate that checks the
//! identity's role. [`guard`] composes both around a router.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tracing::{debug, warn};

use super::domain::{Identity, Role};
use super::token::TokenService;
use crate::api::ApiError;

pub async fn authenticate(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let identity = tokens.validate(token).map_err(|err| {
        debug!(error = %err, "rejected bearer token");
        ApiError::Unauthenticated("Token is invalid or expired".to_string())
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub async fn require_role(role: Role, request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<Identity>() {
        Some(identity) if identity.role == role => Ok(next.run(request).await),
        Some(identity) => {
            warn!(
                user_id = %identity.user_id,
                role = %identity.role,
                required = %role,
                "role check failed"
            );
            Err(ApiError::Forbidden("Insufficient permissions".to_string()))
        }
        None => Err(ApiError::Unauthenticated("Token is missing".to_string())),
    }
}

/// Wraps every route of `router` with authentication followed by a role check.
pub fn guard<S>(router: Router<S>, tokens: Arc<TokenService>, role: Role) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(middleware::from_fn(move |request: Request, next: Next| {
            require_role(role, request, next)
        }))
        .route_layer(middleware::from_fn_with_state(tokens, authenticate))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let invalid = || ApiError::Unauthenticated("Invalid token format".to_string());

    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthenticated("Token is missing".to_string()))?
        .to_str()
        .map_err(|_| invalid())?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(invalid()),
    }
}
