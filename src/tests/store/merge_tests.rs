use pretty_assertions::assert_eq;

use super::*;
use crate::model::{Analysis, FeedbackEntry, Hypothesis};

fn mk(number: u32, version: &str, history: &[(&str, &str)]) -> Hypothesis {
    let mut h = Hypothesis::draft(
        format!("Hypothesis {}", number),
        "body",
        "plan",
        Analysis::new("t", "s", "g", "p", "pa"),
        vec![],
    );
    h.hypothesis_number = number;
    h.version = version.to_string();
    h.created_at = "2025-01-01T00:00:00Z".to_string();
    let mut before = "1.0".to_string();
    for (i, (text, ts)) in history.iter().enumerate() {
        let after = format!("1.{}", i + 1);
        h.feedback_history.push(FeedbackEntry {
            feedback_text: text.to_string(),
            timestamp: ts.to_string(),
            version_before: before.clone(),
            version_after: after.clone(),
        });
        before = after;
    }
    h
}

#[test]
fn more_history_wins_over_incoming() {
    let existing = vec![mk(
        1,
        "1.2",
        &[("a", "2025-01-02T00:00:00Z"), ("b", "2025-01-03T00:00:00Z")],
    )];
    let incoming = vec![mk(1, "1.1", &[("a", "2025-01-02T00:00:00Z")])];

    let out = merge(&existing, &incoming);
    assert_eq!(out.hypotheses, existing);
    assert_eq!(out.replaced, 0);
    assert!(out.warnings.is_empty());
}

#[test]
fn incoming_with_more_history_replaces_in_place() {
    let existing = vec![
        mk(1, "1.0", &[]),
        mk(2, "1.1", &[("x", "2025-01-02T00:00:00Z")]),
    ];
    let incoming = vec![mk(
        2,
        "1.2",
        &[("x", "2025-01-02T00:00:00Z"), ("y", "2025-01-05T00:00:00Z")],
    )];

    let out = merge(&existing, &incoming);
    assert_eq!(out.hypotheses[0], existing[0]);
    assert_eq!(out.hypotheses[1], incoming[0]);
    assert_eq!(out.replaced, 1);
}

#[test]
fn tie_is_broken_by_latest_update() {
    let older = mk(3, "1.1", &[("x", "2025-01-02T00:00:00Z")]);
    let newer = mk(3, "1.1", &[("x", "2025-01-09T00:00:00Z")]);

    let out = merge(std::slice::from_ref(&older), std::slice::from_ref(&newer));
    assert_eq!(out.hypotheses, vec![newer.clone()]);

    let out = merge(std::slice::from_ref(&newer), std::slice::from_ref(&older));
    assert_eq!(out.hypotheses, vec![newer]);
}

#[test]
fn self_merge_is_a_no_op() {
    let list = vec![
        mk(2, "1.1", &[("x", "2025-01-02T00:00:00Z")]),
        mk(1, "1.0", &[]),
    ];
    let out = merge(&list, &list);
    assert_eq!(out.hypotheses, list);
    assert_eq!(out.added, 0);
    assert_eq!(out.replaced, 0);
    assert!(out.warnings.is_empty());
}

#[test]
fn merge_keeps_every_number_from_both_sides() {
    let existing = vec![mk(5, "1.0", &[]), mk(1, "1.0", &[])];
    let incoming = vec![mk(3, "1.0", &[]), mk(1, "1.0", &[]), mk(9, "1.0", &[])];

    let out = merge(&existing, &incoming);
    let numbers: Vec<u32> = out.hypotheses.iter().map(|h| h.hypothesis_number).collect();
    assert_eq!(numbers, vec![5, 1, 3, 9]);
    assert_eq!(out.added, 2);
}

#[test]
fn divergent_histories_keep_winner_and_warn() {
    let existing = vec![mk(
        4,
        "1.2",
        &[("a", "2025-01-02T00:00:00Z"), ("b", "2025-01-03T00:00:00Z")],
    )];
    let incoming = vec![mk(4, "1.1", &[("other device", "2025-01-04T00:00:00Z")])];

    let out = merge(&existing, &incoming);
    assert_eq!(out.hypotheses, existing);
    assert_eq!(
        out.warnings,
        vec![MergeWarning::DivergentHistory {
            number: 4,
            kept_version: "1.2".to_string(),
            dropped_entries: 1,
        }]
    );
    assert!(out.warnings[0].to_string().contains("dropped 1 feedback entry"));
}
