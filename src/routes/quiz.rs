use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::AttemptStore;
use crate::models::QuizAttempt;
use crate::response::AppError;
use crate::services::quiz::{self, QuizError};
use crate::state::AppState;

const DEFAULT_QUESTION_COUNT: usize = 10;
const MAX_QUESTION_COUNT: usize = 50;
const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 200;
const TOP_MISTAKES: usize = 20;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate/:user_id", get(generate_quiz))
        .route("/submit", post(submit_answer))
        .route("/:user_id/history", get(get_history))
        .route("/:user_id/mistakes", get(get_mistakes))
}

#[derive(Debug, Deserialize)]
struct GenerateQuery {
    count: Option<usize>,
    quiz_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    status: &'static str,
    correct: bool,
}

#[derive(Debug, Serialize)]
struct MistakeSummary {
    question_id: String,
    question_type: String,
    count: usize,
}

async fn generate_quiz(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<GenerateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let count = query
        .count
        .unwrap_or(DEFAULT_QUESTION_COUNT)
        .clamp(1, MAX_QUESTION_COUNT);
    let quiz_type = query.quiz_type.as_deref().unwrap_or("mixed");

    let questions = quiz::generate_quiz(state.store().as_ref(), &user_id, count, quiz_type)
        .await
        .map_err(|err| match err {
            QuizError::NotEnoughItems => AppError::bad_request(err.to_string()),
            QuizError::UnknownQuizType(_) => AppError::validation(err.to_string()),
            QuizError::Store(store_err) => store_err.into(),
        })?;

    Ok(Json(questions))
}

async fn submit_answer(
    State(state): State<AppState>,
    Json(attempt): Json<QuizAttempt>,
) -> Result<impl IntoResponse, AppError> {
    if attempt.user_id.trim().is_empty() || attempt.question_id.trim().is_empty() {
        return Err(AppError::validation(
            "user_id and question_id must not be empty",
        ));
    }

    let correct = attempt.correct;
    state.store().insert_attempt(&attempt).await?;

    Ok(Json(SubmitResponse {
        status: "success",
        correct,
    }))
}

async fn get_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let attempts = state.store().list_attempts(&user_id, limit).await?;
    Ok(Json(attempts))
}

async fn get_mistakes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = state.store().list_incorrect_attempts(&user_id).await?;

    let mut by_question: HashMap<String, MistakeSummary> = HashMap::new();
    for attempt in attempts {
        by_question
            .entry(attempt.question_id.clone())
            .and_modify(|entry| entry.count += 1)
            .or_insert(MistakeSummary {
                question_id: attempt.question_id,
                question_type: attempt.question_type,
                count: 1,
            });
    }

    let mut mistakes: Vec<MistakeSummary> = by_question.into_values().collect();
    mistakes.sort_by(|a, b| b.count.cmp(&a.count));
    mistakes.truncate(TOP_MISTAKES);

    Ok(Json(mistakes))
}
