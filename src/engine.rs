use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::dashboard;
use crate::error::RecapError;
use crate::mastery;
use crate::model::{DashboardStats, DiagnosticResult, ProgressRecord, Revision, WeakConcept};
use crate::schedule;
use crate::store::Store;
use crate::weak;

/// A graded diagnostic as submitted by the surrounding application layer.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSubmission {
    pub user_id: String,
    pub topic: String,
    pub subject: String,
    pub score: u8,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub total_count: u32,
    pub confidence: u8,
    /// Defaults to the submission instant when absent.
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticOutcome {
    pub weak_concept_created: bool,
    pub revisions: Vec<Revision>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub revision: Revision,
    pub progress: ProgressRecord,
}

/// The revision engine: scheduling, mastery progression and dashboard
/// derivation over the key-value store.
///
/// All state is keyed by user id, and at most one request per user is
/// expected to be in flight at a time; the engine itself takes no locks.
pub struct Engine {
    store: Store,
}

fn diagnostic_key(user_id: &str, id: &str) -> String {
    format!("diagnostic:{user_id}:{id}")
}

fn revision_key(user_id: &str, id: &str) -> String {
    format!("revision:{user_id}:{id}")
}

fn revision_prefix(user_id: &str) -> String {
    format!("revision:{user_id}:")
}

fn progress_key(user_id: &str, topic: &str) -> String {
    format!("progress:{user_id}:{topic}")
}

fn progress_prefix(user_id: &str) -> String {
    format!("progress:{user_id}:")
}

fn weak_key(user_id: &str, id: &str) -> String {
    format!("weak:{user_id}:{id}")
}

fn weak_prefix(user_id: &str) -> String {
    format!("weak:{user_id}:")
}

fn decode<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, RecapError> {
    serde_json::from_value(value.clone())
        .map_err(|e| RecapError::Storage(format!("corrupt record: {e}")))
}

impl Engine {
    pub fn new(store: Store) -> Self {
        Engine { store }
    }

    /// Record a graded diagnostic: persist it, flag a weak concept when it
    /// qualifies, and schedule the 1/3/7 revision cohort anchored at its
    /// completion time.
    ///
    /// The three-entry revision batch is logically atomic; a storage
    /// failure partway through propagates without compensation.
    pub async fn submit_diagnostic(
        &mut self,
        submission: DiagnosticSubmission,
        now: DateTime<Utc>,
    ) -> Result<DiagnosticOutcome, RecapError> {
        if submission.user_id.trim().is_empty() {
            return Err(RecapError::Validation("user id is required".into()));
        }
        if submission.topic.trim().is_empty() {
            return Err(RecapError::Validation("topic is required".into()));
        }
        if submission.subject.trim().is_empty() {
            return Err(RecapError::Validation("subject is required".into()));
        }
        if submission.score > 100 {
            return Err(RecapError::Validation(
                "score must be between 0 and 100".into(),
            ));
        }
        if !(1..=5).contains(&submission.confidence) {
            return Err(RecapError::Validation(
                "confidence must be between 1 and 5".into(),
            ));
        }

        let completed_at = submission.completed_at.unwrap_or(now);
        let diagnostic = DiagnosticResult {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: submission.user_id,
            topic: submission.topic,
            subject: submission.subject,
            score: submission.score,
            correct_count: submission.correct_count,
            total_count: submission.total_count,
            confidence: submission.confidence,
            completed_at,
        };
        self.put(
            &diagnostic_key(&diagnostic.user_id, &diagnostic.id),
            &diagnostic,
        )
        .await?;

        let weak_concept_created = weak::is_weak(diagnostic.score, diagnostic.confidence);
        if weak_concept_created {
            let concept = WeakConcept {
                user_id: diagnostic.user_id.clone(),
                topic: diagnostic.topic.clone(),
                subject: diagnostic.subject.clone(),
                score: diagnostic.score,
                confidence: diagnostic.confidence,
                created_at: now,
            };
            let id = uuid::Uuid::new_v4().to_string();
            self.put(&weak_key(&concept.user_id, &id), &concept).await?;
        }

        let revisions = schedule::schedule_revisions(
            &diagnostic.user_id,
            &diagnostic.topic,
            &diagnostic.subject,
            completed_at,
        );
        for revision in &revisions {
            self.put(&revision_key(&revision.user_id, &revision.id), revision)
                .await?;
        }

        tracing::info!(
            user_id = %diagnostic.user_id,
            topic = %diagnostic.topic,
            score = diagnostic.score,
            weak = weak_concept_created,
            "diagnostic recorded"
        );

        Ok(DiagnosticOutcome {
            weak_concept_created,
            revisions,
        })
    }

    /// Revisions due on or before `as_of` (calendar date), in the order
    /// they were scheduled.
    pub fn due_revisions_for(
        &self,
        user_id: &str,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<Revision>, RecapError> {
        let revisions = self.revisions_for(user_id)?;
        Ok(schedule::filter_due(&revisions, as_of))
    }

    /// Complete a revision with a recall score and fold the score into the
    /// topic's progress record.
    pub async fn complete_revision(
        &mut self,
        user_id: &str,
        revision_id: &str,
        recall_score: u8,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome, RecapError> {
        if !(1..=10).contains(&recall_score) {
            return Err(RecapError::Validation(
                "recall score must be between 1 and 10".into(),
            ));
        }

        // Keys carry the owner, so another user's revision id looks the
        // same as a missing one.
        let key = revision_key(user_id, revision_id);
        let mut revision: Revision = match self.store.get(&key) {
            Some(value) => decode(value)?,
            None => return Err(RecapError::NotFound),
        };
        schedule::complete(&mut revision, recall_score, now);
        self.put(&key, &revision).await?;

        let progress_key = progress_key(user_id, &revision.topic);
        let existing: ProgressRecord = match self.store.get(&progress_key) {
            Some(value) => decode(value)?,
            None => ProgressRecord::new(user_id, &revision.topic, now),
        };
        let progress = mastery::update_progress(&existing, revision.revision_day, recall_score, now);
        self.put(&progress_key, &progress).await?;

        tracing::info!(
            user_id = %user_id,
            topic = %revision.topic,
            revision_day = revision.revision_day,
            recall_score,
            mastery = progress.mastery_level.as_str(),
            "revision completed"
        );

        Ok(CompletionOutcome { revision, progress })
    }

    /// The four headline numbers for a user's dashboard.
    pub fn dashboard_stats(
        &self,
        user_id: &str,
        as_of: DateTime<Utc>,
    ) -> Result<DashboardStats, RecapError> {
        let weak_concepts = self.weak_concepts_for(user_id)?;
        let revisions = self.revisions_for(user_id)?;
        let progress = self.progress_for(user_id)?;
        Ok(dashboard::stats(&weak_concepts, &revisions, &progress, as_of))
    }

    pub fn weak_concepts_for(&self, user_id: &str) -> Result<Vec<WeakConcept>, RecapError> {
        self.store
            .get_by_prefix(&weak_prefix(user_id))
            .into_iter()
            .map(decode)
            .collect()
    }

    pub fn progress_for(&self, user_id: &str) -> Result<Vec<ProgressRecord>, RecapError> {
        self.store
            .get_by_prefix(&progress_prefix(user_id))
            .into_iter()
            .map(decode)
            .collect()
    }

    fn revisions_for(&self, user_id: &str) -> Result<Vec<Revision>, RecapError> {
        self.store
            .get_by_prefix(&revision_prefix(user_id))
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn put<T: serde::Serialize>(&mut self, key: &str, record: &T) -> Result<(), RecapError> {
        let value = serde_json::to_value(record)
            .map_err(|e| RecapError::Storage(format!("failed to encode record: {e}")))?;
        self.store.set(key, value).await
    }
}
