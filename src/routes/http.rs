// GET handlers: version, ping, and text/JSON views of the cached snapshot

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::error::CollectorError;
use crate::format::{self, StatusMode};
use crate::version::{NAME, VERSION};

#[derive(Debug, Default, Deserialize)]
pub(super) struct StatusQuery {
    mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FormatQuery {
    format: Option<String>,
}

impl FormatQuery {
    fn json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/ping: liveness only; never touches the collector.
pub(super) async fn ping_handler() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], "pong")
}

/// GET /api/status: short (default), long, or full JSON snapshot.
pub(super) async fn status_handler(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, CollectorError> {
    let snapshot = state.collector.get_or_compute().await?;
    Ok(match StatusMode::parse(query.mode.as_deref()) {
        StatusMode::Json => Json(snapshot.as_ref()).into_response(),
        StatusMode::Long => format::status_long(&snapshot, &state.disk_mount).into_response(),
        StatusMode::Short => format::status_short(&snapshot).into_response(),
    })
}

pub(super) async fn sys_handler(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<Response, CollectorError> {
    let s = state.collector.get_or_compute().await?;
    if !query.json() {
        return Ok(format::sys_text(&s, &state.disk_mount).into_response());
    }
    Ok(Json(serde_json::json!({
        "uptimeSeconds": s.uptime_seconds,
        "load": s.load_averages,
        "cpu": { "cores": s.cores, "percent": s.cpu_percent },
        "memory": { "used": s.mem_used_bytes, "total": s.mem_total_bytes, "percent": s.mem_percent() },
        "swap": { "used": s.swap_used_bytes, "total": s.swap_total_bytes, "percent": s.swap_percent() },
        "disk": { "mount": state.disk_mount, "percent": s.disk_percent },
    }))
    .into_response())
}

pub(super) async fn net_handler(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<Response, CollectorError> {
    let s = state.collector.get_or_compute().await?;
    if !query.json() {
        return Ok(format::net_text(&s).into_response());
    }
    Ok(Json(serde_json::json!({
        "iface": s.network.iface,
        "ip": s.network.ip,
        "rates": { "rxPerSec": s.network.rx_per_sec, "txPerSec": s.network.tx_per_sec },
    }))
    .into_response())
}

pub(super) async fn disk_handler(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<Response, CollectorError> {
    let s = state.collector.get_or_compute().await?;
    if !query.json() {
        return Ok(format::disk_text(&s, &state.disk_mount).into_response());
    }
    Ok(Json(serde_json::json!({
        "mounts": [{ "mount": state.disk_mount, "percent": s.disk_percent }],
    }))
    .into_response())
}
