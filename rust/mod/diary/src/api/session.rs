use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use foodlog_core::{AnonymousSession, ServiceError};

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/anonymous", post(create_anonymous))
}

/// POST /auth/anonymous: mint a new user and an empty profile for it.
async fn create_anonymous(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<AnonymousSession>), ServiceError> {
    let session = state.identity.create_anonymous_session()?;
    state
        .svc
        .ensure_profile(&session.user_id)
        .map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(session)))
}
