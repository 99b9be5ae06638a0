use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Extension, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use foodlog_core::ServiceError;

use crate::api::middleware::Actor;
use crate::api::AppState;
use crate::model::UploadedImage;

/// Largest accepted image body.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/uploads",
        post(upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
    )
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    /// Original file name; only its extension is kept.
    #[serde(default)]
    name: String,
}

/// POST /uploads?name=photo.jpg: raw image body, type from `Content-Type`.
async fn upload_image(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadedImage>), ServiceError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let uploaded = state
        .svc
        .upload_image(actor.id(), &query.name, &body, content_type)?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}
