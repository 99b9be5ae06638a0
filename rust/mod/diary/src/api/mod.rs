mod middleware;
mod posts;
mod profiles;
mod ranking;
mod session;
mod uploads;

use std::sync::Arc;

use axum::Router;

use foodlog_core::{IdentityProvider, ServiceError};

use crate::model::LikeKind;
use crate::service::DiaryService;

pub use middleware::Actor;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub svc: Arc<DiaryService>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Build the complete diary API router. Routes are absolute; the server
/// mounts them at the root.
pub fn build_router(svc: Arc<DiaryService>, identity: Arc<dyn IdentityProvider>) -> Router {
    let state = AppState { svc, identity };

    Router::new()
        .merge(session::routes())
        .merge(posts::routes())
        .merge(ranking::routes())
        .merge(profiles::routes())
        .merge(uploads::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::actor_middleware,
        ))
        .with_state(state)
}

fn parse_kind(kind: &str) -> Result<LikeKind, ServiceError> {
    kind.parse().map_err(ServiceError::Validation)
}
