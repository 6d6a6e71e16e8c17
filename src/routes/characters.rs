use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::ContentStore;
use crate::models::Radical;
use crate::response::AppError;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
    offset: Option<i64>,
    hsk_level: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_characters))
        .route("/search/:query", get(search_characters))
        .route("/:character_id", get(get_character))
        .route("/:character_id/radicals", get(get_character_radicals))
}

async fn list_characters(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let characters = state
        .store()
        .list_characters(limit, offset, query.hsk_level)
        .await?;
    Ok(Json(characters))
}

async fn get_character(
    State(state): State<AppState>,
    Path(character_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let character = state
        .store()
        .get_character(character_id.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Character not found"))?;
    Ok(Json(character))
}

async fn get_character_radicals(
    State(state): State<AppState>,
    Path(character_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store();
    let character = store
        .get_character(character_id.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Character not found"))?;

    let mut radicals: Vec<Radical> = Vec::with_capacity(character.radicals.len());
    for radical_id in &character.radicals {
        if let Some(radical) = store.get_radical(radical_id).await? {
            radicals.push(radical);
        }
    }
    Ok(Json(radicals))
}

async fn search_characters(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let results = state.store().search_characters(query.trim()).await?;
    Ok(Json(results))
}
