use chrono::{DateTime, Utc};

use crate::model::{DashboardStats, ProgressRecord, Revision, WeakConcept};
use crate::schedule;

/// Upper bound on the streak counter. The streak is a capped count of
/// completed revisions, not a consecutive-day calculation.
pub const STREAK_CAP: usize = 7;

pub fn streak(revisions: &[Revision]) -> usize {
    revisions
        .iter()
        .filter(|r| r.completed)
        .count()
        .min(STREAK_CAP)
}

/// Compose the four headline numbers for a user's dashboard.
///
/// `mastery_progress` counts distinct progress records (topics touched),
/// not an average mastery score.
pub fn stats(
    weak_concepts: &[WeakConcept],
    revisions: &[Revision],
    progress: &[ProgressRecord],
    as_of: DateTime<Utc>,
) -> DashboardStats {
    DashboardStats {
        weak_concepts_count: weak_concepts.len(),
        upcoming_revisions_count: revisions
            .iter()
            .filter(|r| schedule::is_due(r, as_of))
            .count(),
        mastery_progress: progress.len(),
        streak: streak(revisions),
    }
}
