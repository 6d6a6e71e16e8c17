use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::ContentStore;
use crate::response::AppError;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_radicals))
        .route("/search/:query", get(search_radicals))
        .route("/:radical_id", get(get_radical))
}

async fn list_radicals(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let radicals = state.store().list_radicals(limit, offset).await?;
    Ok(Json(radicals))
}

async fn get_radical(
    State(state): State<AppState>,
    Path(radical_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let radical = state
        .store()
        .get_radical(radical_id.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Radical not found"))?;
    Ok(Json(radical))
}

async fn search_radicals(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let results = state.store().search_radicals(query.trim()).await?;
    Ok(Json(results))
}
