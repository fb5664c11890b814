//! Version bookkeeping for hypothesis lineages.
//!
//! Only the minor component ever moves; the major component is left for manual re-basing.

use crate::error::SessionError;
use crate::model::{FeedbackEntry, Hypothesis, HypothesisKind, is_version_label};

pub const INITIAL_VERSION: &str = "1.0";

pub fn next_version(current: &str) -> Result<String, SessionError> {
    if !is_version_label(current) {
        return Err(SessionError::InvalidEntity(format!(
            "malformed version {:?}",
            current
        )));
    }
    let (major, minor) = current.split_once('.').unwrap_or((current, "0"));
    let next = minor
        .parse::<u64>()
        .ok()
        .and_then(|m| m.checked_add(1))
        .ok_or_else(|| SessionError::InvalidEntity(format!("version {:?} overflows", current)))?;
    Ok(format!("{}.{}", major, next))
}

/// Feedback captured at submission time, waiting for the revision that will close it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingFeedback {
    pub hypothesis_number: u32,
    pub feedback_text: String,
    pub timestamp: String,
    pub version_before: String,
}

impl PendingFeedback {
    pub fn complete(self, version_after: impl Into<String>) -> FeedbackEntry {
        FeedbackEntry {
            feedback_text: self.feedback_text,
            timestamp: self.timestamp,
            version_before: self.version_before,
            version_after: version_after.into(),
        }
    }
}

pub fn record_feedback(
    hypothesis: &Hypothesis,
    feedback_text: &str,
    now: &str,
) -> Result<PendingFeedback, SessionError> {
    let text = feedback_text.trim();
    if text.is_empty() {
        return Err(SessionError::EmptyFeedback);
    }
    Ok(PendingFeedback {
        hypothesis_number: hypothesis.hypothesis_number,
        feedback_text: text.to_string(),
        timestamp: now.to_string(),
        version_before: hypothesis.version.clone(),
    })
}

/// Builds the next version of `current` from collaborator output.
///
/// Identity, notes and history come from `current`; content comes from `revised`.
/// Fails when `current` moved on since the feedback was recorded.
pub fn apply_revision(
    current: &Hypothesis,
    revised: Hypothesis,
    pending: PendingFeedback,
    now: &str,
) -> Result<Hypothesis, SessionError> {
    if pending.hypothesis_number != current.hypothesis_number
        || pending.version_before != current.version
    {
        return Err(SessionError::InvalidEntity(format!(
            "#{}: revision of v{} arrived after the lineage moved to v{}",
            current.hypothesis_number, pending.version_before, current.version
        )));
    }

    let version = next_version(&current.version)?;
    let mut history = current.feedback_history.clone();
    history.push(pending.complete(version.clone()));

    Ok(Hypothesis {
        hypothesis_number: current.hypothesis_number,
        version,
        kind: HypothesisKind::Improvement,
        notes: current.notes.clone(),
        feedback_history: history,
        created_at: now.to_string(),
        extra: current.extra.clone(),
        ..revised
    })
}

/// Gives freshly generated content its identity as the first version of a new lineage.
pub fn start_lineage(
    draft: Hypothesis,
    number: u32,
    kind: HypothesisKind,
    now: &str,
) -> Hypothesis {
    Hypothesis {
        hypothesis_number: number,
        version: INITIAL_VERSION.to_string(),
        kind,
        notes: String::new(),
        feedback_history: Vec::new(),
        created_at: now.to_string(),
        ..draft
    }
}

#[cfg(test)]
#[path = "tests/lineage_tests.rs"]
mod tests;
