use axum::extract::{Extension, Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use foodlog_core::ServiceError;

use crate::api::middleware::Actor;
use crate::api::AppState;
use crate::model::{ProfileForm, ProfileStats, ProfileView, ToggleFollow};
use crate::service::DiaryError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profiles/me", get(my_profile).put(update_my_profile))
        .route("/profiles/{id}", get(get_profile))
        .route("/profiles/{id}/stats", get(profile_stats))
        .route("/profiles/{id}/follow", post(toggle_follow))
        .route("/follows", get(is_following))
}

/// GET /profiles/me: the caller's own profile, created on first visit.
async fn my_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ProfileView>, ServiceError> {
    let user_id = actor.id().ok_or(DiaryError::AuthRequired)?;
    Ok(Json(state.svc.ensure_profile(user_id)?))
}

async fn update_my_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<ProfileView>, ServiceError> {
    Ok(Json(state.svc.update_profile(actor.id(), form)?))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileView>, ServiceError> {
    Ok(Json(state.svc.get_profile(&id)?))
}

async fn profile_stats(State(state): State<AppState>, Path(id): Path<String>) -> Json<ProfileStats> {
    Json(state.svc.profile_stats(&id))
}

async fn toggle_follow(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ToggleFollow>, ServiceError> {
    Ok(Json(state.svc.toggle_follow(actor.id(), &id)?))
}

#[derive(Debug, Deserialize)]
struct FollowQuery {
    follower: String,
    followee: String,
}

/// GET /follows?follower=&followee=
async fn is_following(
    State(state): State<AppState>,
    Query(query): Query<FollowQuery>,
) -> Json<serde_json::Value> {
    let following = state.svc.is_following(&query.follower, &query.followee);
    Json(serde_json::json!({ "following": following }))
}
