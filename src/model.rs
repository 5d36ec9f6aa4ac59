use chrono::{DateTime, Utc};

/// Result of the initial quiz on a topic. Written once, never mutated.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub id: String,
    pub user_id: String,
    pub topic: String,
    pub subject: String,
    pub score: u8,
    pub correct_count: u32,
    pub total_count: u32,
    pub confidence: u8,
    pub completed_at: DateTime<Utc>,
}

/// One scheduled spaced-repetition review, tied to a day offset of 1, 3 or 7.
///
/// The only mutation a revision ever sees is completion, which sets
/// `completed`, `recall_score` and `completed_at`. Revisions are never
/// deleted.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: String,
    pub user_id: String,
    pub topic: String,
    pub subject: String,
    pub revision_day: u8,
    pub scheduled_date: DateTime<Utc>,
    pub completed: bool,
    pub recall_score: Option<u8>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Discrete classification of a topic's retention trajectory.
///
/// Recomputed from the stored day-scores on every completion, so it can
/// move in either direction between updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    Weak,
    Learning,
    Improving,
    Mastered,
}

impl MasteryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryLevel::Weak => "weak",
            MasteryLevel::Learning => "learning",
            MasteryLevel::Improving => "improving",
            MasteryLevel::Mastered => "mastered",
        }
    }
}

/// Per-user, per-topic accumulation of recall scores across the 1/3/7
/// ladder. Fields for days not yet reviewed stay unset; a repeat review
/// of the same day overwrites only that day's field.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub user_id: String,
    pub topic: String,
    pub day1_score: Option<u8>,
    pub day3_score: Option<u8>,
    pub day7_score: Option<u8>,
    pub mastery_level: MasteryLevel,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    /// Empty record for a topic's first completed revision.
    pub fn new(user_id: &str, topic: &str, now: DateTime<Utc>) -> Self {
        ProgressRecord {
            user_id: user_id.to_string(),
            topic: topic.to_string(),
            day1_score: None,
            day3_score: None,
            day7_score: None,
            mastery_level: MasteryLevel::Weak,
            updated_at: now,
        }
    }
}

/// A topic flagged for remediation by its diagnostic. One entry per
/// qualifying submission; entries are never pruned or deduplicated.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakConcept {
    pub user_id: String,
    pub topic: String,
    pub subject: String,
    pub score: u8,
    pub confidence: u8,
    pub created_at: DateTime<Utc>,
}

/// The four headline numbers on a user's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub weak_concepts_count: usize,
    pub upcoming_revisions_count: usize,
    pub mastery_progress: usize,
    pub streak: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mastery_level_as_str() {
        assert_eq!(MasteryLevel::Weak.as_str(), "weak");
        assert_eq!(MasteryLevel::Learning.as_str(), "learning");
        assert_eq!(MasteryLevel::Improving.as_str(), "improving");
        assert_eq!(MasteryLevel::Mastered.as_str(), "mastered");
    }

    #[test]
    fn mastery_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MasteryLevel::Mastered).unwrap(),
            "\"mastered\""
        );
    }

    #[test]
    fn revision_json_uses_camel_case() {
        let revision = Revision {
            id: "r1".into(),
            user_id: "u1".into(),
            topic: "Thermodynamics".into(),
            subject: "Physics".into(),
            revision_day: 3,
            scheduled_date: Utc.with_ymd_and_hms(2025, 6, 4, 15, 0, 0).unwrap(),
            completed: false,
            recall_score: None,
            completed_at: None,
        };
        let json = serde_json::to_value(&revision).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["revisionDay"], 3);
        assert!(json.get("scheduledDate").is_some());
        assert!(json.get("recallScore").is_some());
    }

    #[test]
    fn progress_json_uses_camel_case() {
        let now = Utc.with_ymd_and_hms(2025, 6, 4, 15, 0, 0).unwrap();
        let mut progress = ProgressRecord::new("u1", "Thermodynamics", now);
        progress.day1_score = Some(6);
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["day1Score"], 6);
        assert!(json["day3Score"].is_null());
        assert_eq!(json["masteryLevel"], "weak");
    }

    #[test]
    fn progress_new_starts_empty_and_weak() {
        let now = Utc.with_ymd_and_hms(2025, 6, 4, 15, 0, 0).unwrap();
        let progress = ProgressRecord::new("u1", "Optics", now);
        assert!(progress.day1_score.is_none());
        assert!(progress.day3_score.is_none());
        assert!(progress.day7_score.is_none());
        assert_eq!(progress.mastery_level, MasteryLevel::Weak);
    }

    #[test]
    fn dashboard_stats_json_uses_camel_case() {
        let stats = DashboardStats {
            weak_concepts_count: 2,
            upcoming_revisions_count: 1,
            mastery_progress: 3,
            streak: 7,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["weakConceptsCount"], 2);
        assert_eq!(json["upcomingRevisionsCount"], 1);
        assert_eq!(json["masteryProgress"], 3);
        assert_eq!(json["streak"], 7);
    }
}
