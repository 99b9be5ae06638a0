//! Route registration: collects module routes + system endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use foodlog_blob::{BlobError, BlobStore, content_type_for_key};
use foodlog_core::ServiceError;

/// Build the complete router. Module routes are already bound to their
/// state and carry absolute paths, so they are merged at the root.
pub fn build_router(blob: Arc<dyn BlobStore>, module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/blobs/{*key}", get(serve_blob))
        .with_state(blob);

    for (name, router) in module_routes {
        tracing::debug!("mounting {} routes", name);
        app = app.merge(router);
    }
    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "foodlogd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /blobs/{key}: serve an uploaded image.
async fn serve_blob(
    State(blob): State<Arc<dyn BlobStore>>,
    Path(key): Path<String>,
) -> Result<Response, ServiceError> {
    let data = blob.get(&key).map_err(|e| match e {
        BlobError::InvalidKey(k) => ServiceError::Validation(format!("invalid blob key: {}", k)),
        other => ServiceError::Storage(other.to_string()),
    })?;
    match data {
        Some(bytes) => Ok(([(header::CONTENT_TYPE, content_type_for_key(&key))], bytes).into_response()),
        None => Err(ServiceError::NotFound(format!("blobs/{}", key))),
    }
}
