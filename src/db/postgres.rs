use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::db::{AttemptStore, ContentStore, ProgressStore, Store, StoreError};
use crate::models::{Character, ItemType, MasteryLevel, QuizAttempt, Radical, UserProgress};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn radical_from_row(row: &PgRow) -> Result<Radical, StoreError> {
    Ok(Radical {
        id: row.try_get("id")?,
        character: row.try_get("character")?,
        meaning: row.try_get("meaning")?,
        stroke_count: row.try_get("strokeCount")?,
        frequency: row.try_get("frequency")?,
        examples: row.try_get("examples")?,
    })
}

fn character_from_row(row: &PgRow) -> Result<Character, StoreError> {
    Ok(Character {
        id: row.try_get("id")?,
        hanzi: row.try_get("hanzi")?,
        pinyin: row.try_get("pinyin")?,
        meaning: row.try_get("meaning")?,
        hsk_level: row.try_get("hskLevel")?,
        frequency: row.try_get("frequency")?,
        radicals: row.try_get("radicals")?,
    })
}

fn progress_from_row(row: &PgRow) -> Result<UserProgress, StoreError> {
    let item_type: String = row.try_get("itemType")?;
    let mastery_level: String = row.try_get("masteryLevel")?;

    Ok(UserProgress {
        user_id: row.try_get("userId")?,
        item_id: row.try_get("itemId")?,
        item_type: ItemType::parse(&item_type)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown item type: {item_type}")))?,
        mastery_level: MasteryLevel::parse(&mastery_level)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown mastery level: {mastery_level}")))?,
        last_reviewed: row.try_get::<DateTime<Utc>, _>("lastReviewed")?,
        next_review: row.try_get::<DateTime<Utc>, _>("nextReview")?,
        correct_count: row.try_get("correctCount")?,
        incorrect_count: row.try_get("incorrectCount")?,
        ease_factor: row.try_get("easeFactor")?,
        interval: row.try_get("interval")?,
    })
}

fn attempt_from_row(row: &PgRow) -> Result<QuizAttempt, StoreError> {
    Ok(QuizAttempt {
        user_id: row.try_get("userId")?,
        question_id: row.try_get("questionId")?,
        question_type: row.try_get("questionType")?,
        answer: row.try_get("answer")?,
        correct: row.try_get("correct")?,
        timestamp: row.try_get::<DateTime<Utc>, _>("timestamp")?,
    })
}

#[async_trait]
impl ContentStore for PostgresStore {
    async fn list_radicals(&self, limit: i64, offset: i64) -> Result<Vec<Radical>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT "id","character","meaning","strokeCount","frequency","examples"
            FROM "radicals"
            ORDER BY "frequency" DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(radical_from_row).collect()
    }

    async fn get_radical(&self, id: &str) -> Result<Option<Radical>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT "id","character","meaning","strokeCount","frequency","examples"
            FROM "radicals"
            WHERE "id" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(radical_from_row).transpose()
    }

    async fn search_radicals(&self, query: &str) -> Result<Vec<Radical>, StoreError> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query(
            r#"
            SELECT "id","character","meaning","strokeCount","frequency","examples"
            FROM "radicals"
            WHERE "meaning" ILIKE $1 OR "character" LIKE $1
            ORDER BY "frequency" DESC
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(radical_from_row).collect()
    }

    async fn list_characters(
        &self,
        limit: i64,
        offset: i64,
        hsk_level: Option<i64>,
    ) -> Result<Vec<Character>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT "id","hanzi","pinyin","meaning","hskLevel","frequency","radicals"
            FROM "characters"
            WHERE ($3::BIGINT IS NULL OR "hskLevel" = $3)
            ORDER BY "frequency" DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .bind(hsk_level)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(character_from_row).collect()
    }

    async fn get_character(&self, id: &str) -> Result<Option<Character>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT "id","hanzi","pinyin","meaning","hskLevel","frequency","radicals"
            FROM "characters"
            WHERE "id" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(character_from_row).transpose()
    }

    async fn search_characters(&self, query: &str) -> Result<Vec<Character>, StoreError> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query(
            r#"
            SELECT "id","hanzi","pinyin","meaning","hskLevel","frequency","radicals"
            FROM "characters"
            WHERE "meaning" ILIKE $1 OR "pinyin" ILIKE $1 OR "hanzi" LIKE $1
            ORDER BY "frequency" DESC
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(character_from_row).collect()
    }
}

#[async_trait]
impl ProgressStore for PostgresStore {
    async fn get_progress(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<Option<UserProgress>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT "userId","itemId","itemType","masteryLevel","lastReviewed","nextReview",
                   "correctCount","incorrectCount","easeFactor","interval"
            FROM "user_progress"
            WHERE "userId" = $1
              AND "itemId" = $2
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(progress_from_row).transpose()
    }

    async fn list_progress(&self, user_id: &str) -> Result<Vec<UserProgress>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT "userId","itemId","itemType","masteryLevel","lastReviewed","nextReview",
                   "correctCount","incorrectCount","easeFactor","interval"
            FROM "user_progress"
            WHERE "userId" = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(progress_from_row).collect()
    }

    async fn upsert_progress(&self, progress: &UserProgress) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO "user_progress"
                ("userId","itemId","itemType","masteryLevel","lastReviewed","nextReview",
                 "correctCount","incorrectCount","easeFactor","interval")
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT ("userId","itemId") DO UPDATE SET
                "itemType" = EXCLUDED."itemType",
                "masteryLevel" = EXCLUDED."masteryLevel",
                "lastReviewed" = EXCLUDED."lastReviewed",
                "nextReview" = EXCLUDED."nextReview",
                "correctCount" = EXCLUDED."correctCount",
                "incorrectCount" = EXCLUDED."incorrectCount",
                "easeFactor" = EXCLUDED."easeFactor",
                "interval" = EXCLUDED."interval"
            "#,
        )
        .bind(&progress.user_id)
        .bind(&progress.item_id)
        .bind(progress.item_type.as_str())
        .bind(progress.mastery_level.as_str())
        .bind(progress.last_reviewed)
        .bind(progress.next_review)
        .bind(progress.correct_count)
        .bind(progress.incorrect_count)
        .bind(progress.ease_factor)
        .bind(progress.interval)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl AttemptStore for PostgresStore {
    async fn insert_attempt(&self, attempt: &QuizAttempt) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO "quiz_attempts"
                ("id","userId","questionId","questionType","answer","correct","timestamp")
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&attempt.user_id)
        .bind(&attempt.question_id)
        .bind(&attempt.question_type)
        .bind(&attempt.answer)
        .bind(attempt.correct)
        .bind(attempt.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_attempts(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<QuizAttempt>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT "userId","questionId","questionType","answer","correct","timestamp"
            FROM "quiz_attempts"
            WHERE "userId" = $1
            ORDER BY "timestamp" DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(attempt_from_row).collect()
    }

    async fn list_incorrect_attempts(&self, user_id: &str) -> Result<Vec<QuizAttempt>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT "userId","questionId","questionType","answer","correct","timestamp"
            FROM "quiz_attempts"
            WHERE "userId" = $1
              AND "correct" = FALSE
            ORDER BY "timestamp" DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(attempt_from_row).collect()
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
