// Gate for protected routes; denied requests never reach the collector.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::auth::Access;

pub(super) async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match state.authorizer.authorize(request.headers()) {
        Access::Allowed => next.run(request).await,
        Access::Denied => {
            tracing::debug!(path = %request.uri().path(), "request denied");
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}
