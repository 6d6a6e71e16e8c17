use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn review_body(item_id: &str, item_type: &str, correct: bool) -> Value {
    json!({ "item_id": item_id, "item_type": item_type, "correct": correct })
}

#[tokio::test]
async fn test_root_welcome() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to Happy Hanzy API");
}

#[tokio::test]
async fn test_health() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "connected");
}

#[tokio::test]
async fn test_list_radicals_sorted_by_frequency() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/api/radicals").await;

    assert_eq!(status, StatusCode::OK);
    let radicals = body.as_array().unwrap();
    assert_eq!(radicals.len(), 20);
    // "一" has the highest seed frequency.
    assert_eq!(radicals[0]["character"], "一");
}

#[tokio::test]
async fn test_list_radicals_pagination() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/api/radicals?limit=5&offset=0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_get_radical_by_id() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/api/radicals/rad-ren").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["character"], "人");
    assert_eq!(body["meaning"], "person");
}

#[tokio::test]
async fn test_get_missing_radical_is_404() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/api/radicals/rad-nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_search_radicals_by_meaning() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/api/radicals/search/person").await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert!(results.iter().any(|r| r["id"] == "rad-ren"));
}

#[tokio::test]
async fn test_list_characters_with_hsk_filter() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/api/characters?hsk_level=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 10);

    let app = common::create_test_app().await;
    let (status, body) = get(app, "/api/characters?hsk_level=6").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_character_radicals_lookup() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/api/characters/char-hao/radicals").await;

    assert_eq!(status, StatusCode::OK);
    let radicals = body.as_array().unwrap();
    assert_eq!(radicals.len(), 2);
    assert!(radicals.iter().any(|r| r["character"] == "女"));
    assert!(radicals.iter().any(|r| r["character"] == "子"));
}

#[tokio::test]
async fn test_search_characters_by_meaning() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/api/characters/search/good").await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert!(results.iter().any(|c| c["hanzi"] == "好"));
}

#[tokio::test]
async fn test_first_review_creates_record() {
    let app = common::create_test_app().await;

    let (status, body) = post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("rad-ren", "radical", true),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let progress = &body["progress"];
    assert_eq!(progress["interval"], 1);
    assert_eq!(progress["correct_count"], 1);
    assert_eq!(progress["mastery_level"], "learning");
    assert!((progress["ease_factor"].as_f64().unwrap() - 2.6).abs() < 1e-9);
}

#[tokio::test]
async fn test_consecutive_reviews_grow_interval() {
    let app = common::create_test_app().await;

    let (_, _) = post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("rad-kou", "radical", true),
    )
    .await;
    let (status, body) = post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("rad-kou", "radical", true),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"]["interval"], 6);
    assert_eq!(body["progress"]["mastery_level"], "familiar");
}

#[tokio::test]
async fn test_incorrect_review_resets_interval() {
    let app = common::create_test_app().await;

    for _ in 0..3 {
        post_json(
            app.clone(),
            "/api/progress/u1/review",
            review_body("char-hao", "character", true),
        )
        .await;
    }
    let (status, body) = post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("char-hao", "character", false),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"]["interval"], 1);
    assert_eq!(body["progress"]["incorrect_count"], 1);
}

#[tokio::test]
async fn test_review_rejects_blank_item_id() {
    let app = common::create_test_app().await;
    let (status, body) = post_json(
        app,
        "/api/progress/u1/review",
        review_body("   ", "radical", true),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_progress_list_includes_retention() {
    let app = common::create_test_app().await;

    post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("rad-ren", "radical", true),
    )
    .await;
    post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("rad-ren", "radical", false),
    )
    .await;

    let (status, body) = get(app, "/api/progress/u1").await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert!((records[0]["retention_rate"].as_f64().unwrap() - 50.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_due_items_empty_after_fresh_review() {
    let app = common::create_test_app().await;

    post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("rad-ren", "radical", true),
    )
    .await;

    // next_review is a day out, so nothing is due yet.
    let (status, body) = get(app, "/api/progress/u1/due").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_progress_stats_aggregation() {
    let app = common::create_test_app().await;

    post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("rad-ren", "radical", true),
    )
    .await;
    post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("char-hao", "character", true),
    )
    .await;
    post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("char-hao", "character", false),
    )
    .await;

    let (status, body) = get(app, "/api/progress/u1/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_learned"], 2);
    assert_eq!(body["total_reviews"], 3);
    assert_eq!(body["streak_days"], 0);
    let accuracy = body["accuracy_rate"].as_f64().unwrap();
    assert!((accuracy - 200.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_quiz_requires_enough_studied_items() {
    let app = common::create_test_app().await;

    post_json(
        app.clone(),
        "/api/progress/u1/review",
        review_body("rad-ren", "radical", true),
    )
    .await;

    let (status, body) = get(app, "/api/quiz/generate/u1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_quiz_generation_after_studying() {
    let app = common::create_test_app().await;

    for item in ["rad-ren", "rad-kou", "rad-shou", "rad-xin"] {
        post_json(
            app.clone(),
            "/api/progress/u1/review",
            review_body(item, "radical", true),
        )
        .await;
    }

    let (status, body) = get(app, "/api/quiz/generate/u1?count=5").await;
    assert_eq!(status, StatusCode::OK);
    let questions = body.as_array().unwrap();
    assert!(!questions.is_empty());
    for question in questions {
        let options = question["options"].as_array().unwrap();
        let correct = question["correct_answer"].as_str().unwrap();
        assert!(options.iter().any(|o| o == correct));
        assert!(options.len() >= 2);
    }
}

#[tokio::test]
async fn test_quiz_rejects_unknown_type() {
    let app = common::create_test_app().await;

    for item in ["rad-ren", "rad-kou", "rad-shou", "rad-xin"] {
        post_json(
            app.clone(),
            "/api/progress/u1/review",
            review_body(item, "radical", true),
        )
        .await;
    }

    let (status, _) = get(app, "/api/quiz/generate/u1?quiz_type=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quiz_submit_history_and_mistakes() {
    let app = common::create_test_app().await;

    let attempt = |question_id: &str, correct: bool| {
        json!({
            "user_id": "u1",
            "question_id": question_id,
            "question_type": "meaning_match",
            "answer": "person",
            "correct": correct,
            "timestamp": "2024-05-01T12:00:00Z",
        })
    };

    let (status, body) = post_json(app.clone(), "/api/quiz/submit", attempt("q_1", true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], true);

    post_json(app.clone(), "/api/quiz/submit", attempt("q_2", false)).await;
    post_json(app.clone(), "/api/quiz/submit", attempt("q_2", false)).await;

    let (status, body) = get(app.clone(), "/api/quiz/u1/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = get(app, "/api/quiz/u1/mistakes").await;
    assert_eq!(status, StatusCode::OK);
    let mistakes = body.as_array().unwrap();
    assert_eq!(mistakes.len(), 1);
    assert_eq!(mistakes[0]["question_id"], "q_2");
    assert_eq!(mistakes[0]["count"], 2);
}

#[tokio::test]
async fn test_404_fallback_is_json() {
    let app = common::create_test_app().await;
    let (status, body) = get(app, "/nonexistent/path").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}
