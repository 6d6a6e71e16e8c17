//! Multiple-choice question generation from a learner's studied items.

use rand::seq::{IndexedRandom, SliceRandom};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{ContentStore, ProgressStore, Store, StoreError};
use crate::models::{Character, ItemType, Radical};

/// Minimum number of studied items needed before a quiz can be built:
/// one correct answer plus three distractors.
pub const MIN_STUDIED_ITEMS: usize = 4;
const WRONG_OPTION_COUNT: usize = 3;
const DISTRACTOR_POOL_LIMIT: i64 = 20;

pub const QUESTION_TYPES: &[&str] = &[
    "radical_recognition",
    "meaning_match",
    "character_composition",
];

#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub question_type: String,
    pub question_text: String,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub item_id: String,
    pub item_type: ItemType,
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Not enough learned items to generate quiz")]
    NotEnoughItems,
    #[error("unknown quiz type: {0}")]
    UnknownQuizType(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub async fn generate_quiz(
    store: &dyn Store,
    user_id: &str,
    count: usize,
    quiz_type: &str,
) -> Result<Vec<QuizQuestion>, QuizError> {
    let question_types: Vec<&str> = if quiz_type == "mixed" {
        QUESTION_TYPES.to_vec()
    } else if QUESTION_TYPES.contains(&quiz_type) {
        vec![quiz_type]
    } else {
        return Err(QuizError::UnknownQuizType(quiz_type.to_string()));
    };

    let studied = store.list_progress(user_id).await?;
    if studied.len() < MIN_STUDIED_ITEMS {
        return Err(QuizError::NotEnoughItems);
    }

    let mut questions = Vec::with_capacity(count);

    for _ in 0..count {
        // ThreadRng is not Send, so keep it out of scope across the awaits.
        let (selected_type, item) = {
            let mut rng = rand::rng();
            (
                *question_types
                    .choose(&mut rng)
                    .expect("question type list is non-empty"),
                studied.choose(&mut rng).expect("studied list is non-empty"),
            )
        };

        let question = match item.item_type {
            ItemType::Radical => radical_question(store, &item.item_id, selected_type).await?,
            ItemType::Character => character_question(store, &item.item_id, selected_type).await?,
        };

        if let Some(question) = question {
            questions.push(question);
        }
    }

    Ok(questions)
}

fn question_id(item_id: &str) -> String {
    format!("q_{}_{}", item_id, Uuid::new_v4())
}

fn shuffled(correct: String, mut wrong: Vec<String>) -> (String, Vec<String>) {
    wrong.truncate(WRONG_OPTION_COUNT);
    let mut options = Vec::with_capacity(wrong.len() + 1);
    options.push(correct.clone());
    options.extend(wrong);
    options.shuffle(&mut rand::rng());
    (correct, options)
}

async fn radical_question(
    store: &dyn Store,
    radical_id: &str,
    question_type: &str,
) -> Result<Option<QuizQuestion>, QuizError> {
    let Some(radical) = store.get_radical(radical_id).await? else {
        return Ok(None);
    };

    let distractors: Vec<Radical> = store
        .list_radicals(DISTRACTOR_POOL_LIMIT, 0)
        .await?
        .into_iter()
        .filter(|r| r.id != radical_id)
        .collect();

    if question_type == "radical_recognition" {
        let (correct_answer, options) = shuffled(
            radical.meaning.clone(),
            distractors.iter().map(|r| r.meaning.clone()).collect(),
        );
        Ok(Some(QuizQuestion {
            id: question_id(radical_id),
            question_type: "radical_recognition".to_string(),
            question_text: format!("What does the radical '{}' mean?", radical.character),
            correct_answer,
            options,
            item_id: radical_id.to_string(),
            item_type: ItemType::Radical,
        }))
    } else {
        let (correct_answer, options) = shuffled(
            radical.character.clone(),
            distractors.iter().map(|r| r.character.clone()).collect(),
        );
        Ok(Some(QuizQuestion {
            id: question_id(radical_id),
            question_type: "meaning_match".to_string(),
            question_text: format!("Which radical means '{}'?", radical.meaning),
            correct_answer,
            options,
            item_id: radical_id.to_string(),
            item_type: ItemType::Radical,
        }))
    }
}

async fn character_question(
    store: &dyn Store,
    character_id: &str,
    question_type: &str,
) -> Result<Option<QuizQuestion>, QuizError> {
    let Some(character) = store.get_character(character_id).await? else {
        return Ok(None);
    };

    if question_type == "meaning_match" || question_type == "radical_recognition" {
        let distractors: Vec<Character> = store
            .list_characters(DISTRACTOR_POOL_LIMIT, 0, None)
            .await?
            .into_iter()
            .filter(|c| c.id != character_id)
            .collect();

        let (correct_answer, options) = shuffled(
            character.meaning.clone(),
            distractors.iter().map(|c| c.meaning.clone()).collect(),
        );
        return Ok(Some(QuizQuestion {
            id: question_id(character_id),
            question_type: "meaning_match".to_string(),
            question_text: format!("What does '{}' mean?", character.hanzi),
            correct_answer,
            options,
            item_id: character_id.to_string(),
            item_type: ItemType::Character,
        }));
    }

    composition_question(store, &character, character_id).await
}

async fn composition_question(
    store: &dyn Store,
    character: &Character,
    character_id: &str,
) -> Result<Option<QuizQuestion>, QuizError> {
    if character.radicals.is_empty() {
        return Ok(None);
    }

    let mut composing = Vec::with_capacity(character.radicals.len());
    for radical_id in &character.radicals {
        if let Some(radical) = store.get_radical(radical_id).await? {
            composing.push(radical.character);
        }
    }
    if composing.is_empty() {
        return Ok(None);
    }

    let wrong_pool: Vec<String> = store
        .list_radicals(DISTRACTOR_POOL_LIMIT, 0)
        .await?
        .into_iter()
        .filter(|r| !character.radicals.contains(&r.id))
        .map(|r| r.character)
        .collect();
    if wrong_pool.is_empty() {
        return Ok(None);
    }

    let mut rng = rand::rng();
    let sample_size = composing.len().min(wrong_pool.len());
    let wrong_options: Vec<String> = (0..WRONG_OPTION_COUNT)
        .map(|_| {
            wrong_pool
                .choose_multiple(&mut rng, sample_size)
                .cloned()
                .collect::<Vec<String>>()
                .join(", ")
        })
        .collect();

    let (correct_answer, options) = shuffled(composing.join(", "), wrong_options);

    Ok(Some(QuizQuestion {
        id: question_id(character_id),
        question_type: "character_composition".to_string(),
        question_text: format!("Which radicals compose '{}'?", character.hanzi),
        correct_answer,
        options,
        item_id: character_id.to_string(),
        item_type: ItemType::Character,
    }))
}
