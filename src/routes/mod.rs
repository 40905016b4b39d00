// HTTP routes: public health/version, protected snapshot views

mod auth;
mod http;

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::Authorizer;
use crate::collector::Collector;
use crate::config::AppConfig;
use crate::error::CollectorError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) collector: Arc<Collector>,
    pub(crate) authorizer: Arc<dyn Authorizer>,
    pub(crate) disk_mount: String,
}

pub fn app(collector: Arc<Collector>, authorizer: Arc<dyn Authorizer>, config: &AppConfig) -> Router {
    let state = AppState {
        collector,
        authorizer,
        disk_mount: config.collector.disk_mount.clone(),
    };
    let protected = Router::new()
        .route("/api/status", get(http::status_handler)) // GET /api/status?mode=short|long|json
        .route("/api/sys", get(http::sys_handler)) // GET /api/sys?format=json
        .route("/api/net", get(http::net_handler)) // GET /api/net?format=json
        .route("/api/disk", get(http::disk_handler)) // GET /api/disk?format=json
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));
    Router::new()
        .route("/", get(|| async { "hoststat: single-host telemetry" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/ping", get(http::ping_handler)) // GET /api/ping
        .merge(protected)
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

impl IntoResponse for CollectorError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, operation = "get_or_compute", "snapshot unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, self.to_string()).into_response()
    }
}
