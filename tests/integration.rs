use chrono::{DateTime, TimeZone, Utc};

use recap::engine::{DiagnosticSubmission, Engine};
use recap::model::MasteryLevel;
use recap::store::Store;

// Integration tests exercise the public library surface: the engine's
// operation contracts over in-memory and file-backed stores.

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
}

fn thermodynamics(completed_at: DateTime<Utc>) -> DiagnosticSubmission {
    DiagnosticSubmission {
        user_id: "learner-1".into(),
        topic: "Thermodynamics".into(),
        subject: "Physics".into(),
        score: 55,
        correct_count: 11,
        total_count: 20,
        confidence: 2,
        completed_at: Some(completed_at),
    }
}

#[tokio::test]
async fn full_revision_cycle() {
    let mut engine = Engine::new(Store::in_memory());
    let anchor = at(1, 15);

    // A weak diagnostic schedules the 1/3/7 cohort.
    let outcome = engine
        .submit_diagnostic(thermodynamics(anchor), anchor)
        .await
        .unwrap();
    assert!(outcome.weak_concept_created);
    assert_eq!(outcome.revisions.len(), 3);
    assert_eq!(outcome.revisions[0].scheduled_date, at(2, 15));
    assert_eq!(outcome.revisions[1].scheduled_date, at(4, 15));
    assert_eq!(outcome.revisions[2].scheduled_date, at(8, 15));

    // Nothing is due on the diagnostic day.
    assert!(engine.due_revisions_for("learner-1", anchor).unwrap().is_empty());

    // One calendar day later only the day-1 revision is due, from midnight.
    let due = engine.due_revisions_for("learner-1", at(2, 0)).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].revision_day, 1);
    let day1_id = due[0].id.clone();

    // Completing it folds the recall score into progress. 6 sits below
    // the 60 cutoff, so the classification stays weak.
    let completion = engine
        .complete_revision("learner-1", &day1_id, 6, at(2, 9))
        .await
        .unwrap();
    assert_eq!(completion.progress.day1_score, Some(6));
    assert_eq!(completion.progress.mastery_level, MasteryLevel::Weak);

    // The completed revision drops out of the due list.
    let due = engine.due_revisions_for("learner-1", at(2, 10)).unwrap();
    assert!(due.is_empty());

    // Work through days 3 and 7.
    let due = engine.due_revisions_for("learner-1", at(4, 9)).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].revision_day, 3);
    engine
        .complete_revision("learner-1", &due[0].id, 8, at(4, 9))
        .await
        .unwrap();

    let due = engine.due_revisions_for("learner-1", at(8, 9)).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].revision_day, 7);
    let last = engine
        .complete_revision("learner-1", &due[0].id, 9, at(8, 9))
        .await
        .unwrap();

    // All three day fields recorded; the raw 1-10 scores never reach the
    // 0-100 thresholds, so the topic classifies weak throughout.
    assert_eq!(last.progress.day1_score, Some(6));
    assert_eq!(last.progress.day3_score, Some(8));
    assert_eq!(last.progress.day7_score, Some(9));
    assert_eq!(last.progress.mastery_level, MasteryLevel::Weak);

    // Dashboard after the full cycle: one weak concept, nothing due,
    // one topic touched, three completions.
    let stats = engine.dashboard_stats("learner-1", at(9, 9)).unwrap();
    assert_eq!(stats.weak_concepts_count, 1);
    assert_eq!(stats.upcoming_revisions_count, 0);
    assert_eq!(stats.mastery_progress, 1);
    assert_eq!(stats.streak, 3);
}

#[tokio::test]
async fn streak_caps_at_seven_across_topics() {
    let mut engine = Engine::new(Store::in_memory());
    let anchor = at(1, 8);

    for (i, topic) in ["Heat", "Light", "Sound", "Waves"].iter().enumerate() {
        let submission = DiagnosticSubmission {
            user_id: "learner-1".into(),
            topic: (*topic).into(),
            subject: "Physics".into(),
            score: 50 + i as u8,
            correct_count: 10,
            total_count: 20,
            confidence: 2,
            completed_at: Some(anchor),
        };
        engine.submit_diagnostic(submission, anchor).await.unwrap();
    }

    // Twelve revisions exist; complete ten of them.
    let due = engine.due_revisions_for("learner-1", at(30, 0)).unwrap();
    assert_eq!(due.len(), 12);
    for revision in due.iter().take(10) {
        engine
            .complete_revision("learner-1", &revision.id, 5, at(30, 9))
            .await
            .unwrap();
    }

    let stats = engine.dashboard_stats("learner-1", at(30, 10)).unwrap();
    assert_eq!(stats.streak, 7);
    assert_eq!(stats.upcoming_revisions_count, 2);
    assert_eq!(stats.mastery_progress, 4);
}

#[tokio::test]
async fn users_are_isolated() {
    let mut engine = Engine::new(Store::in_memory());
    let anchor = at(1, 15);
    engine
        .submit_diagnostic(thermodynamics(anchor), anchor)
        .await
        .unwrap();

    assert!(engine.due_revisions_for("learner-2", at(30, 0)).unwrap().is_empty());
    let stats = engine.dashboard_stats("learner-2", at(30, 0)).unwrap();
    assert_eq!(stats.weak_concepts_count, 0);
    assert_eq!(stats.streak, 0);
}

#[tokio::test]
async fn state_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recap.json");
    let anchor = at(1, 15);

    let day1_id = {
        let store = Store::open(&path).await.unwrap();
        let mut engine = Engine::new(store);
        let outcome = engine
            .submit_diagnostic(thermodynamics(anchor), anchor)
            .await
            .unwrap();
        outcome.revisions[0].id.clone()
    };

    // A fresh engine over the same file sees the schedule and can
    // complete against it.
    let store = Store::open(&path).await.unwrap();
    let mut engine = Engine::new(store);

    let due = engine.due_revisions_for("learner-1", at(2, 0)).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, day1_id);

    engine
        .complete_revision("learner-1", &day1_id, 6, at(2, 9))
        .await
        .unwrap();

    // Reopen once more and confirm the completion persisted.
    let store = Store::open(&path).await.unwrap();
    let engine = Engine::new(store);
    let stats = engine.dashboard_stats("learner-1", at(2, 10)).unwrap();
    assert_eq!(stats.streak, 1);
    assert_eq!(stats.weak_concepts_count, 1);
    let progress = engine.progress_for("learner-1").unwrap();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].day1_score, Some(6));
}
