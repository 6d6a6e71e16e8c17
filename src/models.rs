use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of learnable item a progress record or quiz question refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Radical,
    Character,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Radical => "radical",
            Self::Character => "character",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "radical" => Some(Self::Radical),
            "character" => Some(Self::Character),
            _ => None,
        }
    }
}

/// Discrete learning stage of an item. Transitions happen only inside the
/// review scheduler; stored and serialized as the lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    New,
    Learning,
    Familiar,
    Mastered,
}

impl MasteryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Familiar => "familiar",
            Self::Mastered => "mastered",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "learning" => Some(Self::Learning),
            "familiar" => Some(Self::Familiar),
            "mastered" => Some(Self::Mastered),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Radical {
    pub id: String,
    pub character: String,
    pub meaning: String,
    pub stroke_count: i64,
    pub frequency: i64,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub hanzi: String,
    pub pinyin: String,
    pub meaning: String,
    pub hsk_level: i64,
    pub frequency: i64,
    #[serde(default)]
    pub radicals: Vec<String>,
}

/// Per-user, per-item scheduling state. Unique on `(user_id, item_id)`.
///
/// Invariants maintained by the scheduler: `ease_factor >= 1.3`,
/// `interval >= 0` (`>= 1` once reviewed), and
/// `next_review == last_reviewed + interval days` after every update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: String,
    pub item_id: String,
    pub item_type: ItemType,
    pub mastery_level: MasteryLevel,
    pub last_reviewed: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
    pub correct_count: i64,
    pub incorrect_count: i64,
    pub ease_factor: f64,
    pub interval: i64,
}

impl UserProgress {
    /// Fresh record for an item reviewed for the first time.
    pub fn new(
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        item_type: ItemType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            item_type,
            mastery_level: MasteryLevel::New,
            last_reviewed: now,
            next_review: now,
            correct_count: 0,
            incorrect_count: 0,
            ease_factor: 2.5,
            interval: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub user_id: String,
    pub question_id: String,
    pub question_type: String,
    pub answer: String,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
}
