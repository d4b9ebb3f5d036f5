use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::applications::ApplicationError;
use crate::auth::AuthError;
use crate::jobs::JobBoardError;
use crate::profiles::ProfileError;
use crate::storage::RepositoryError;
use crate::uploads::UploadError;

const INTERNAL_MESSAGE: &str = "Internal server error";

pub type ApiResult<T> = Result<T, ApiError>;

/// Boundary error. Every variant renders as `{"error": message}`; internal details are logged
/// and replaced with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn internal(source: impl std::fmt::Display) -> Self {
        ApiError::Internal(source.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        ApiError::internal(value)
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Validation(message) => ApiError::Validation(message),
            AuthError::UserExists => ApiError::Validation(value.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthenticated(value.to_string()),
            AuthError::Credential(_) | AuthError::Token(_) | AuthError::Repository(_) => {
                ApiError::internal(value)
            }
        }
    }
}

impl From<JobBoardError> for ApiError {
    fn from(value: JobBoardError) -> Self {
        match value {
            JobBoardError::Validation(message) => ApiError::Validation(message),
            JobBoardError::NotFound | JobBoardError::AccessDenied => {
                ApiError::NotFound(value.to_string())
            }
            JobBoardError::Repository(_) => ApiError::internal(value),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::JobNotFound | ApplicationError::ApplicationNotFound => {
                ApiError::NotFound(value.to_string())
            }
            ApplicationError::DuplicateApplication => ApiError::Conflict(value.to_string()),
            ApplicationError::NotOwner => ApiError::Forbidden(value.to_string()),
            ApplicationError::InvalidStatus(_) => ApiError::Validation(value.to_string()),
            ApplicationError::InvalidTransition { .. } => ApiError::Conflict(value.to_string()),
            ApplicationError::Repository(_) => ApiError::internal(value),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(value: ProfileError) -> Self {
        match value {
            ProfileError::NotFound => ApiError::NotFound(value.to_string()),
            ProfileError::NoFields => ApiError::Validation(value.to_string()),
            ProfileError::Upload(err) => err.into(),
            ProfileError::Repository(_) => ApiError::internal(value),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(value: UploadError) -> Self {
        match value {
            UploadError::UnsupportedType | UploadError::TooLarge { .. } => {
                ApiError::Validation("Invalid file type or failed to save file".to_string())
            }
            UploadError::InvalidName => ApiError::NotFound("File not found".to_string()),
            UploadError::Io(ref err) if err.kind() == std::io::ErrorKind::NotFound => {
                ApiError::NotFound("File not found".to_string())
            }
            UploadError::Io(_) => ApiError::internal(value),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::Validation(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        ApiError::Validation(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound("Resource not found".to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(value: MultipartError) -> Self {
        ApiError::Validation(value.body_text())
    }
}
