use chrono::{DateTime, Days, Utc};

use crate::model::Revision;

/// The fixed review ladder: each graded diagnostic schedules one revision
/// at each of these day offsets.
pub const REVISION_DAYS: [u8; 3] = [1, 3, 7];

/// Create the three-entry review cohort for a freshly graded diagnostic.
///
/// Each entry lands `day` calendar days after `anchor`, keeping the
/// anchor's time-of-day. There is no de-duplication against open
/// revisions for the same topic: a repeated diagnostic produces an
/// overlapping cohort.
pub fn schedule_revisions(
    user_id: &str,
    topic: &str,
    subject: &str,
    anchor: DateTime<Utc>,
) -> Vec<Revision> {
    REVISION_DAYS
        .iter()
        .map(|&day| Revision {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            topic: topic.to_string(),
            subject: subject.to_string(),
            revision_day: day,
            scheduled_date: anchor + Days::new(day as u64),
            completed: false,
            recall_score: None,
            completed_at: None,
        })
        .collect()
}

/// A revision is due once its scheduled calendar date has arrived;
/// time-of-day is ignored, so a revision scheduled for 3pm is due from
/// midnight. Completed revisions are never due.
pub fn is_due(revision: &Revision, as_of: DateTime<Utc>) -> bool {
    !revision.completed && revision.scheduled_date.date_naive() <= as_of.date_naive()
}

/// Filter to due revisions, preserving input order.
pub fn filter_due(revisions: &[Revision], as_of: DateTime<Utc>) -> Vec<Revision> {
    revisions
        .iter()
        .filter(|r| is_due(r, as_of))
        .cloned()
        .collect()
}

/// Mark a revision completed with the given recall score.
///
/// Re-completing an already-completed revision is allowed and overwrites
/// the recall score and completion time.
pub fn complete(revision: &mut Revision, recall_score: u8, now: DateTime<Utc>) {
    revision.completed = true;
    revision.recall_score = Some(recall_score);
    revision.completed_at = Some(now);
}
