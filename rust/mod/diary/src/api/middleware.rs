use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::AppState;

/// The authenticated user of a request, if any.
///
/// Every request gets one; anonymous requests carry `None` and the service
/// decides which operations need a user.
#[derive(Debug, Clone, Default)]
pub struct Actor(pub Option<String>);

impl Actor {
    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Resolve the actor through the identity provider and store it as an
/// extension for handlers (`Extension<Actor>`).
pub async fn actor_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let actor = state.identity.current_user_id(req.headers());
    req.extensions_mut().insert(Actor(actor));
    next.run(req).await
}
