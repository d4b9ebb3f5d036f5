use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use super::storage::CvStorage;
use crate::api::ApiResult;

/// Public `GET /uploads/:filename`.
pub fn upload_routes(storage: Arc<CvStorage>) -> Router {
    Router::new()
        .route("/uploads/:filename", get(serve_handler))
        .with_state(storage)
}

pub(crate) async fn serve_handler(
    State(storage): State<Arc<CvStorage>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(filename) = path?;
    let contents = storage.read(&filename).await?;
    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, content_type.to_string())], contents))
}
