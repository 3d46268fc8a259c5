use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/live", get(live))
}

/// Plain-text banner at `/`; older clients probe it as a liveness check.
pub async fn banner() -> &'static str {
    "LexiEase backend running"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: &'static str,
    #[serde(rename = "storeBackend")]
    store_backend: &'static str,
    timestamp: String,
    #[serde(rename = "uptimeSeconds")]
    uptime_seconds: u64,
}

async fn root(State(state): State<AppState>) -> Response {
    let store_ok = state.store().ping().await.is_ok();

    let response = HealthResponse {
        status: if store_ok { "ok" } else { "degraded" },
        store: if store_ok { "connected" } else { "disconnected" },
        store_backend: state.store().backend_name(),
        timestamp: now_iso(),
        uptime_seconds: state.uptime_seconds(),
    };

    let status_code = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response)).into_response()
}

#[derive(Serialize)]
struct LiveResponse {
    status: &'static str,
    timestamp: String,
}

async fn live() -> Response {
    Json(LiveResponse {
        status: "healthy",
        timestamp: now_iso(),
    })
    .into_response()
}

fn now_iso() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
