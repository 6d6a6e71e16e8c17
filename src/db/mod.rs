pub mod memory;
pub mod migrate;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Character, QuizAttempt, Radical, UserProgress};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Storage failure, as opposed to "not found" which lookups express as
/// `Ok(None)` so callers can tell the two apart.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid stored value: {0}")]
    Corrupt(String),
}

/// Read access to learning content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_radicals(&self, limit: i64, offset: i64) -> Result<Vec<Radical>, StoreError>;
    async fn get_radical(&self, id: &str) -> Result<Option<Radical>, StoreError>;
    async fn search_radicals(&self, query: &str) -> Result<Vec<Radical>, StoreError>;
    async fn list_characters(
        &self,
        limit: i64,
        offset: i64,
        hsk_level: Option<i64>,
    ) -> Result<Vec<Character>, StoreError>;
    async fn get_character(&self, id: &str) -> Result<Option<Character>, StoreError>;
    async fn search_characters(&self, query: &str) -> Result<Vec<Character>, StoreError>;
}

/// Persistence for per-user scheduling records. The scheduler itself never
/// talks to a concrete store; routes load records through this interface,
/// run the scheduler, and write the result back.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get_progress(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<Option<UserProgress>, StoreError>;
    async fn list_progress(&self, user_id: &str) -> Result<Vec<UserProgress>, StoreError>;
    async fn upsert_progress(&self, progress: &UserProgress) -> Result<(), StoreError>;
}

/// Quiz attempt log.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn insert_attempt(&self, attempt: &QuizAttempt) -> Result<(), StoreError>;
    /// Newest first.
    async fn list_attempts(&self, user_id: &str, limit: i64)
        -> Result<Vec<QuizAttempt>, StoreError>;
    async fn list_incorrect_attempts(&self, user_id: &str) -> Result<Vec<QuizAttempt>, StoreError>;
}

/// Everything the service layer needs from a backing store.
#[async_trait]
pub trait Store: ContentStore + ProgressStore + AttemptStore {
    async fn ping(&self) -> Result<(), StoreError>;
}
