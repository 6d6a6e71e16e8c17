use axum::Router;

pub async fn create_test_app() -> Router {
    // No DATABASE_URL: the app falls back to the seeded in-memory store.
    std::env::set_var("DATABASE_URL", "");
    std::env::set_var("CORS_ORIGINS", "http://localhost:3000");

    hanzy_backend_rust::create_app().await
}
