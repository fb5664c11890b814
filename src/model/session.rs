use super::hypothesis::{Hypothesis, HypothesisKind};

/// In-memory session. `hypotheses` keeps insertion order; numbers are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub research_goal: String,
    pub model_identifier: String,
    pub created_at: String,
    pub updated_at: String,
    pub hypotheses: Vec<Hypothesis>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub original: usize,
    pub improvements: usize,
    pub new_alternatives: usize,
}

impl Session {
    pub fn new(
        research_goal: impl Into<String>,
        model_identifier: impl Into<String>,
        now: &str,
    ) -> Self {
        Self {
            research_goal: research_goal.into(),
            model_identifier: model_identifier.into(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
            hypotheses: Vec::new(),
        }
    }

    pub fn position(&self, number: u32) -> Option<usize> {
        self.hypotheses
            .iter()
            .position(|h| h.hypothesis_number == number)
    }

    pub fn get(&self, number: u32) -> Option<&Hypothesis> {
        self.hypotheses
            .iter()
            .find(|h| h.hypothesis_number == number)
    }

    /// Next unused lineage number (numbers are never reused within a session).
    pub fn next_number(&self) -> u32 {
        self.hypotheses
            .iter()
            .map(|h| h.hypothesis_number)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Sorted lineage numbers, for prompts and the titles overlay.
    pub fn numbers(&self) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .hypotheses
            .iter()
            .map(|h| h.hypothesis_number)
            .collect();
        out.sort_unstable();
        out
    }

    /// Replaces the record with the same number in place, or appends it.
    /// Returns the index the record ended up at.
    pub fn upsert(&mut self, hypothesis: Hypothesis) -> usize {
        match self.position(hypothesis.hypothesis_number) {
            Some(i) => {
                self.hypotheses[i] = hypothesis;
                i
            }
            None => {
                self.hypotheses.push(hypothesis);
                self.hypotheses.len() - 1
            }
        }
    }

    pub fn kind_counts(&self) -> KindCounts {
        let mut counts = KindCounts::default();
        for h in &self.hypotheses {
            match h.kind {
                HypothesisKind::Original => counts.original += 1,
                HypothesisKind::Improvement => counts.improvements += 1,
                HypothesisKind::NewAlternative => counts.new_alternatives += 1,
            }
        }
        counts
    }

    pub fn total_feedback_entries(&self) -> usize {
        self.hypotheses
            .iter()
            .map(|h| h.feedback_history.len())
            .sum()
    }
}
