//! In-memory store, used by the test suite and as the standalone fallback
//! when no `DATABASE_URL` is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::{AttemptStore, ContentStore, ProgressStore, Store, StoreError};
use crate::models::{Character, QuizAttempt, Radical, UserProgress};

#[derive(Default)]
pub struct MemoryStore {
    radicals: RwLock<Vec<Radical>>,
    characters: RwLock<Vec<Character>>,
    progress: RwLock<HashMap<(String, String), UserProgress>>,
    attempts: RwLock<Vec<QuizAttempt>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the sample learning content.
    pub fn with_seed_content() -> Self {
        let store = Self::new();
        *store.radicals.write() = crate::seed::sample_radicals();
        *store.characters.write() = crate::seed::sample_characters();
        store
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_radicals(&self, limit: i64, offset: i64) -> Result<Vec<Radical>, StoreError> {
        let mut radicals = self.radicals.read().clone();
        radicals.sort_by_key(|r| std::cmp::Reverse(r.frequency));
        Ok(radicals
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn get_radical(&self, id: &str) -> Result<Option<Radical>, StoreError> {
        Ok(self.radicals.read().iter().find(|r| r.id == id).cloned())
    }

    async fn search_radicals(&self, query: &str) -> Result<Vec<Radical>, StoreError> {
        let needle = query.to_lowercase();
        let mut matches: Vec<Radical> = self
            .radicals
            .read()
            .iter()
            .filter(|r| r.meaning.to_lowercase().contains(&needle) || r.character.contains(query))
            .cloned()
            .collect();
        matches.sort_by_key(|r| std::cmp::Reverse(r.frequency));
        Ok(matches)
    }

    async fn list_characters(
        &self,
        limit: i64,
        offset: i64,
        hsk_level: Option<i64>,
    ) -> Result<Vec<Character>, StoreError> {
        let mut characters: Vec<Character> = self
            .characters
            .read()
            .iter()
            .filter(|c| hsk_level.map_or(true, |level| c.hsk_level == level))
            .cloned()
            .collect();
        characters.sort_by_key(|c| std::cmp::Reverse(c.frequency));
        Ok(characters
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn get_character(&self, id: &str) -> Result<Option<Character>, StoreError> {
        Ok(self.characters.read().iter().find(|c| c.id == id).cloned())
    }

    async fn search_characters(&self, query: &str) -> Result<Vec<Character>, StoreError> {
        let needle = query.to_lowercase();
        let mut matches: Vec<Character> = self
            .characters
            .read()
            .iter()
            .filter(|c| {
                c.meaning.to_lowercase().contains(&needle)
                    || c.pinyin.to_lowercase().contains(&needle)
                    || c.hanzi.contains(query)
            })
            .cloned()
            .collect();
        matches.sort_by_key(|c| std::cmp::Reverse(c.frequency));
        Ok(matches)
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn get_progress(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<Option<UserProgress>, StoreError> {
        Ok(self
            .progress
            .read()
            .get(&(user_id.to_string(), item_id.to_string()))
            .cloned())
    }

    async fn list_progress(&self, user_id: &str) -> Result<Vec<UserProgress>, StoreError> {
        Ok(self
            .progress
            .read()
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_progress(&self, progress: &UserProgress) -> Result<(), StoreError> {
        self.progress.write().insert(
            (progress.user_id.clone(), progress.item_id.clone()),
            progress.clone(),
        );
        Ok(())
    }
}

#[async_trait]
impl AttemptStore for MemoryStore {
    async fn insert_attempt(&self, attempt: &QuizAttempt) -> Result<(), StoreError> {
        self.attempts.write().push(attempt.clone());
        Ok(())
    }

    async fn list_attempts(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<QuizAttempt>, StoreError> {
        let mut attempts: Vec<QuizAttempt> = self
            .attempts
            .read()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        attempts.sort_by_key(|a| std::cmp::Reverse(a.timestamp));
        attempts.truncate(limit.max(0) as usize);
        Ok(attempts)
    }

    async fn list_incorrect_attempts(&self, user_id: &str) -> Result<Vec<QuizAttempt>, StoreError> {
        let mut attempts: Vec<QuizAttempt> = self
            .attempts
            .read()
            .iter()
            .filter(|a| a.user_id == user_id && !a.correct)
            .cloned()
            .collect();
        attempts.sort_by_key(|a| std::cmp::Reverse(a.timestamp));
        Ok(attempts)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
