use chrono::{DateTime, Utc};

use crate::model::{MasteryLevel, ProgressRecord};

// Thresholds assume a 0-100 scale, while the completion flow records raw
// 1-10 recall scores into the day fields. The comparison is kept literal
// rather than rescaled, pending product clarification.
pub const DAY1_LEARNING_MIN: u8 = 60;
pub const DAY3_IMPROVING_MIN: u8 = 70;
pub const DAY7_MASTERED_MIN: u8 = 80;

/// Classify a topic's retention from the day-scores recorded so far.
///
/// Reads the scores as they stood BEFORE the score for `day_completed`
/// is merged; the caller applies the field update separately.
pub fn compute_mastery_level(existing: &ProgressRecord, day_completed: u8) -> MasteryLevel {
    let day1 = existing.day1_score.unwrap_or(0);
    let day3 = existing.day3_score.unwrap_or(0);
    let day7 = existing.day7_score.unwrap_or(0);

    if day_completed == 7 && day7 >= DAY7_MASTERED_MIN {
        MasteryLevel::Mastered
    } else if day_completed >= 3 && day3 >= DAY3_IMPROVING_MIN && day1 >= DAY1_LEARNING_MIN {
        MasteryLevel::Improving
    } else if day_completed == 1 && day1 >= DAY1_LEARNING_MIN {
        MasteryLevel::Learning
    } else {
        MasteryLevel::Weak
    }
}

/// Merge one day's recall score into the progress record.
///
/// Only the field for `day_completed` is overwritten; previously recorded
/// days are preserved. The mastery level is recomputed from the pre-merge
/// snapshot, so it can move backward as well as forward.
pub fn update_progress(
    existing: &ProgressRecord,
    day_completed: u8,
    recall_score: u8,
    now: DateTime<Utc>,
) -> ProgressRecord {
    let mastery_level = compute_mastery_level(existing, day_completed);
    let mut updated = existing.clone();
    match day_completed {
        1 => updated.day1_score = Some(recall_score),
        3 => updated.day3_score = Some(recall_score),
        7 => updated.day7_score = Some(recall_score),
        _ => {}
    }
    updated.mastery_level = mastery_level;
    updated.updated_at = now;
    updated
}
