/// Diagnostic score below this flags the topic for remediation.
pub const WEAK_SCORE_CUTOFF: u8 = 70;

/// Self-rated confidence below this flags the topic regardless of score.
pub const LOW_CONFIDENCE_CUTOFF: u8 = 3;

/// A topic is weak when the diagnostic score or the learner's confidence
/// falls below its cutoff. Evaluated once per diagnostic submission,
/// never re-evaluated on revision completion.
pub fn is_weak(score: u8, confidence: u8) -> bool {
    score < WEAK_SCORE_CUTOFF || confidence < LOW_CONFIDENCE_CUTOFF
}
