mod characters;
mod health;
mod progress;
mod quiz;
mod radicals;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/radicals", radicals::router())
        .nest("/api/characters", characters::router())
        .nest("/api/progress", progress::router())
        .nest("/api/quiz", quiz::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
