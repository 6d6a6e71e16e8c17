//! SM-2-style review scheduling over binary correct/incorrect outcomes.

use chrono::{DateTime, Duration, Utc};

use crate::models::{MasteryLevel, UserProgress};

pub const MIN_EASE_FACTOR: f64 = 1.3;
const EASE_REWARD: f64 = 0.1;
const EASE_PENALTY: f64 = 0.2;
const FIRST_INTERVAL_DAYS: i64 = 1;
const SECOND_INTERVAL_DAYS: i64 = 6;
const MASTERED_MIN_INTERVAL_DAYS: i64 = 21;
const MASTERED_MIN_CORRECT: i64 = 5;

/// Due-sort tie-break: less mastered items come first.
fn mastery_priority(level: MasteryLevel) -> u8 {
    match level {
        MasteryLevel::New => 0,
        MasteryLevel::Learning => 1,
        MasteryLevel::Familiar => 2,
        MasteryLevel::Mastered => 3,
    }
}

/// Apply one review outcome to a progress record.
///
/// `now` is used for both `last_reviewed` and `next_review` so the two
/// timestamps cannot drift apart. Out-of-range ease factors on input are
/// pulled back to the floor rather than rejected.
pub fn apply_review(progress: &mut UserProgress, correct: bool, now: DateTime<Utc>) {
    if correct {
        progress.correct_count += 1;

        // Quality fixed at 4 for a correct answer.
        progress.ease_factor = (progress.ease_factor + EASE_REWARD).max(MIN_EASE_FACTOR);

        if progress.interval == 0 {
            progress.interval = FIRST_INTERVAL_DAYS;
        } else if progress.interval == FIRST_INTERVAL_DAYS {
            progress.interval = SECOND_INTERVAL_DAYS;
        } else {
            progress.interval = (progress.interval as f64 * progress.ease_factor) as i64;
        }

        // Recomputed from thresholds each time, not stepped from the
        // current level.
        if progress.interval >= MASTERED_MIN_INTERVAL_DAYS
            && progress.correct_count >= MASTERED_MIN_CORRECT
        {
            progress.mastery_level = MasteryLevel::Mastered;
        } else if progress.interval >= SECOND_INTERVAL_DAYS {
            progress.mastery_level = MasteryLevel::Familiar;
        } else if progress.correct_count >= 1 {
            progress.mastery_level = MasteryLevel::Learning;
        }
    } else {
        progress.incorrect_count += 1;

        progress.ease_factor = (progress.ease_factor - EASE_PENALTY).max(MIN_EASE_FACTOR);

        // Hard reset regardless of how long the interval had grown.
        progress.interval = 1;

        // One stage down from the current level, unlike the promotion path.
        progress.mastery_level = match progress.mastery_level {
            MasteryLevel::Mastered => MasteryLevel::Familiar,
            MasteryLevel::Familiar => MasteryLevel::Learning,
            _ => MasteryLevel::New,
        };
    }

    progress.last_reviewed = now;
    progress.next_review = now + Duration::days(progress.interval);
}

/// Records due at `now`, earliest due first; ties broken by mastery stage
/// with less mastered items sorting earlier. The input is left untouched.
pub fn due_for_review(progress: &[UserProgress], now: DateTime<Utc>) -> Vec<UserProgress> {
    let mut due: Vec<UserProgress> = progress
        .iter()
        .filter(|p| p.next_review <= now)
        .cloned()
        .collect();
    due.sort_by_key(|p| (p.next_review, mastery_priority(p.mastery_level)));
    due
}

/// Share of historical reviews answered correctly, as a percentage.
/// A record with no reviews yet reports 0.0.
pub fn retention_rate(progress: &UserProgress) -> f64 {
    let total = progress.correct_count + progress.incorrect_count;
    if total == 0 {
        return 0.0;
    }
    progress.correct_count as f64 / total as f64 * 100.0
}
