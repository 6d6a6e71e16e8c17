pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod response;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::state::AppState;

pub async fn create_app() -> axum::Router {
    let config = Config::from_env();
    let store = init_store().await;

    routes::router(AppState::new(store))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
}

/// Postgres when `DATABASE_URL` is configured and reachable, otherwise the
/// seeded in-memory store so the service stays usable standalone.
async fn init_store() -> Arc<dyn Store> {
    let url = std::env::var("DATABASE_URL").unwrap_or_default();
    if url.trim().is_empty() {
        tracing::info!("DATABASE_URL not set, using in-memory store");
        return Arc::new(db::MemoryStore::with_seed_content());
    }

    match db::PostgresStore::connect(url.trim()).await {
        Ok(store) => match db::migrate::run_migrations(store.pool()).await {
            Ok(()) => {
                seed::seed_content(&store).await;
                tracing::info!("using postgres store");
                Arc::new(store)
            }
            Err(err) => {
                tracing::warn!(error = %err, "migrations failed, falling back to in-memory store");
                Arc::new(db::MemoryStore::with_seed_content())
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "postgres unavailable, falling back to in-memory store");
            Arc::new(db::MemoryStore::with_seed_content())
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
