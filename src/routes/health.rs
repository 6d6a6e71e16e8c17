use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::db::Store;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

#[derive(Serialize)]
struct WelcomeResponse {
    message: &'static str,
    version: &'static str,
    uptime: u64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    storage: &'static str,
    timestamp: String,
}

async fn root(State(state): State<AppState>) -> Response {
    Json(WelcomeResponse {
        message: "Welcome to Happy Hanzy API",
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.uptime_seconds(),
    })
    .into_response()
}

async fn health(State(state): State<AppState>) -> Response {
    let storage_ok = state.store().ping().await.is_ok();

    let response = HealthResponse {
        status: if storage_ok { "healthy" } else { "degraded" },
        storage: if storage_ok { "connected" } else { "disconnected" },
        timestamp: now_iso(),
    };

    let status_code = if storage_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response)).into_response()
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
