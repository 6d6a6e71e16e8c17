use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::ProgressStore;
use crate::models::{ItemType, MasteryLevel, UserProgress};
use crate::response::AppError;
use crate::services::srs;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id", get(get_user_progress))
        .route("/:user_id/due", get(get_due_items))
        .route("/:user_id/review", post(record_review))
        .route("/:user_id/stats", get(get_progress_stats))
}

#[derive(Debug, Deserialize)]
struct ReviewRequest {
    item_id: String,
    item_type: ItemType,
    correct: bool,
}

#[derive(Debug, Serialize)]
struct ReviewResponse {
    status: &'static str,
    progress: UserProgress,
}

#[derive(Debug, Serialize)]
struct ProgressWithRetention {
    #[serde(flatten)]
    progress: UserProgress,
    retention_rate: f64,
}

#[derive(Debug, Serialize)]
struct ProgressStats {
    total_learned: usize,
    radicals_mastered: usize,
    characters_mastered: usize,
    accuracy_rate: f64,
    streak_days: i64,
    total_reviews: i64,
}

async fn get_user_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let records = state.store().list_progress(&user_id).await?;

    let annotated: Vec<ProgressWithRetention> = records
        .into_iter()
        .map(|progress| ProgressWithRetention {
            retention_rate: srs::retention_rate(&progress),
            progress,
        })
        .collect();
    Ok(Json(annotated))
}

async fn get_due_items(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let records = state.store().list_progress(&user_id).await?;
    let due = srs::due_for_review(&records, Utc::now());
    Ok(Json(due))
}

async fn record_review(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<ReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item_id = payload.item_id.trim().to_string();
    if item_id.is_empty() {
        return Err(AppError::validation("item_id must not be empty"));
    }

    let store = state.store();
    let now = Utc::now();

    // Created lazily on first review of an item.
    let mut progress = store
        .get_progress(&user_id, &item_id)
        .await?
        .unwrap_or_else(|| UserProgress::new(user_id.clone(), item_id.clone(), payload.item_type, now));

    srs::apply_review(&mut progress, payload.correct, now);
    store.upsert_progress(&progress).await?;

    tracing::debug!(
        user = %user_id,
        item = %item_id,
        correct = payload.correct,
        interval = progress.interval,
        mastery = progress.mastery_level.as_str(),
        "review recorded"
    );

    Ok(Json(ReviewResponse {
        status: "success",
        progress,
    }))
}

async fn get_progress_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let records = state.store().list_progress(&user_id).await?;

    let mut radicals_mastered = 0usize;
    let mut characters_mastered = 0usize;
    let mut total_correct = 0i64;
    let mut total_attempts = 0i64;

    for record in &records {
        if record.mastery_level == MasteryLevel::Mastered {
            match record.item_type {
                ItemType::Radical => radicals_mastered += 1,
                ItemType::Character => characters_mastered += 1,
            }
        }
        total_correct += record.correct_count;
        total_attempts += record.correct_count + record.incorrect_count;
    }

    let accuracy_rate = if total_attempts > 0 {
        total_correct as f64 / total_attempts as f64 * 100.0
    } else {
        0.0
    };

    Ok(Json(ProgressStats {
        total_learned: records.len(),
        radicals_mastered,
        characters_mastered,
        accuracy_rate,
        // Streak tracking is not implemented; the field is kept for
        // response-shape compatibility.
        streak_days: 0,
        total_reviews: total_attempts,
    }))
}
