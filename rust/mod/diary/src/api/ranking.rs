use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use foodlog_core::ServiceError;

use crate::api::{AppState, parse_kind};

const DEFAULT_RANKING_SIZE: usize = 10;
const MAX_RANKING_SIZE: usize = 100;

pub fn routes() -> Router<AppState> {
    Router::new().route("/ranking/{kind}", get(ranking))
}

#[derive(Debug, Deserialize)]
struct RankingQuery {
    limit: Option<usize>,
}

/// GET /ranking/{kind}: leaderboard for `article` or `review` likes.
async fn ranking(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let kind = parse_kind(&kind)?;
    let limit = query.limit.unwrap_or(DEFAULT_RANKING_SIZE).min(MAX_RANKING_SIZE);
    let items = state.svc.rank_posts(kind, limit);
    Ok(Json(serde_json::json!({
        "kind": kind,
        "items": items,
    })))
}
