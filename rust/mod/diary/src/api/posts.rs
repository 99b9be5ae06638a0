use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use foodlog_core::{ListParams, ListResult, ServiceError};

use crate::api::middleware::Actor;
use crate::api::{AppState, parse_kind};
use crate::model::{CreatedPost, LikeCounts, PostFilter, PostForm, PostSummary, PostView, ToggleLike};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post))
        .route("/posts/{id}/likes", get(count_likes))
        .route("/posts/{id}/likes/{kind}", post(toggle_like))
}

#[derive(Debug, Deserialize)]
struct FeedQuery {
    /// Only this user's posts.
    user: Option<String>,
    /// Everyone but this user.
    exclude_user: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl FeedQuery {
    fn filter(&self) -> PostFilter {
        match (&self.user, &self.exclude_user) {
            (Some(id), _) => PostFilter::ForUser(id.clone()),
            (None, Some(id)) => PostFilter::ExcludeUser(id.clone()),
            (None, None) => PostFilter::All,
        }
    }

    fn page(&self) -> ListParams {
        let defaults = ListParams::default();
        ListParams {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(defaults.offset),
        }
    }
}

async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Json<ListResult<PostSummary>> {
    Json(state.svc.list_posts(query.filter(), &query.page()))
}

async fn create_post(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(form): Json<PostForm>,
) -> Result<(StatusCode, Json<CreatedPost>), ServiceError> {
    let created = state.svc.create_post(actor.id(), form)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_post(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<PostView>, ServiceError> {
    Ok(Json(state.svc.get_post_view(&id, actor.id())?))
}

async fn count_likes(State(state): State<AppState>, Path(id): Path<String>) -> Json<LikeCounts> {
    Json(state.svc.count_likes(&id))
}

async fn toggle_like(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Json<ToggleLike>, ServiceError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.svc.toggle_like(actor.id(), &id, kind)?))
}
