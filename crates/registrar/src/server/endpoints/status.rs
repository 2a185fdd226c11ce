use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::types::AppState;

/// GET /health
pub async fn get_health(State(s): State<Arc<AppState>>) -> Response {
    let uptime_secs = (Utc::now() - s.started_at).num_seconds().max(0);

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "uptime_secs": uptime_secs,
            "active_sessions": s.sessions.len(),
        })),
    )
        .into_response()
}

/// GET /report_cache/stats
pub async fn get_report_cache_stats(State(s): State<Arc<AppState>>) -> Response {
    (StatusCode::OK, Json(s.reports.stats())).into_response()
}
