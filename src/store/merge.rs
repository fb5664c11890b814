use std::cmp::Ordering;

use crate::model::Hypothesis;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeWarning {
    /// Both sides changed the lineage independently; the losing side's extra feedback was
    /// not carried over.
    DivergentHistory {
        number: u32,
        kept_version: String,
        dropped_entries: usize,
    },
}

impl std::fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeWarning::DivergentHistory {
                number,
                kept_version,
                dropped_entries,
            } => write!(
                f,
                "#{} histories diverged; kept v{} and dropped {} feedback entr{}",
                number,
                kept_version,
                dropped_entries,
                if *dropped_entries == 1 { "y" } else { "ies" }
            ),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeOutcome {
    pub hypotheses: Vec<Hypothesis>,
    pub added: usize,
    pub replaced: usize,
    pub warnings: Vec<MergeWarning>,
}

/// Folds `incoming` into `existing`, matching lineages by number.
///
/// On a collision the side with more feedback wins, then the more recently updated one,
/// then the existing one. Non-colliding incoming records are appended in order.
pub fn merge(existing: &[Hypothesis], incoming: &[Hypothesis]) -> MergeOutcome {
    let mut out = MergeOutcome {
        hypotheses: existing.to_vec(),
        ..MergeOutcome::default()
    };

    for candidate in incoming {
        let Some(i) = out
            .hypotheses
            .iter()
            .position(|h| h.hypothesis_number == candidate.hypothesis_number)
        else {
            out.hypotheses.push(candidate.clone());
            out.added += 1;
            continue;
        };

        let current = &out.hypotheses[i];
        let incoming_wins = prefer(candidate, current) == Ordering::Greater;
        let (winner, loser) = if incoming_wins {
            (candidate, current)
        } else {
            (current, candidate)
        };

        if !is_prefix(&loser.feedback_history, &winner.feedback_history) {
            let dropped = loser
                .feedback_history
                .iter()
                .filter(|e| !winner.feedback_history.contains(e))
                .count();
            out.warnings.push(MergeWarning::DivergentHistory {
                number: winner.hypothesis_number,
                kept_version: winner.version.clone(),
                dropped_entries: dropped,
            });
        }

        if incoming_wins {
            out.hypotheses[i] = candidate.clone();
            out.replaced += 1;
        }
    }

    out
}

fn prefer(a: &Hypothesis, b: &Hypothesis) -> Ordering {
    a.feedback_history
        .len()
        .cmp(&b.feedback_history.len())
        .then_with(|| match (a.updated_at_ts(), b.updated_at_ts()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        })
}

fn is_prefix<T: PartialEq>(short: &[T], long: &[T]) -> bool {
    short.len() <= long.len() && short.iter().zip(long).all(|(a, b)| a == b)
}
