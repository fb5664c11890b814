use super::*;

fn mk_hypothesis(version: &str) -> Hypothesis {
    let mut h = Hypothesis::draft(
        "Soil microbes regulate drought tolerance",
        "Body",
        "Plan",
        Analysis::new("t", "s", "g", "p", "pa"),
        vec![],
    );
    h.hypothesis_number = 1;
    h.version = version.to_string();
    h.created_at = "2025-03-01T10:00:00Z".to_string();
    h
}

fn entry(ts: &str, before: &str, after: &str) -> FeedbackEntry {
    FeedbackEntry {
        feedback_text: "tighten the claim".to_string(),
        timestamp: ts.to_string(),
        version_before: before.to_string(),
        version_after: after.to_string(),
    }
}

#[test]
fn accepts_well_formed_hypothesis() {
    let mut h = mk_hypothesis("1.2");
    h.feedback_history = vec![
        entry("2025-03-01T10:05:00Z", "1.0", "1.1"),
        entry("2025-03-01T10:05:00Z", "1.1", "1.2"),
    ];
    assert!(validate(&h).is_ok());
}

#[test]
fn rejects_malformed_versions() {
    for bad in ["1", "1.", ".3", "v1.0", "1.0.1", "1.a", ""] {
        let h = mk_hypothesis(bad);
        assert!(
            matches!(validate(&h), Err(crate::error::SessionError::InvalidEntity(_))),
            "{bad:?} should be rejected"
        );
    }
    assert!(is_version_label("12.40"));
}

#[test]
fn rejects_incomplete_analysis() {
    let mut h = mk_hypothesis("1.0");
    let mut fields = std::collections::BTreeMap::new();
    fields.insert("testability".to_string(), "t".to_string());
    h.analysis = Analysis::from_map(fields);

    let err = validate(&h).unwrap_err().to_string();
    assert!(err.contains("parsimony"), "{err}");
    assert!(err.contains("specificity"), "{err}");
}

#[test]
fn rejects_history_going_back_in_time() {
    let mut h = mk_hypothesis("1.2");
    h.feedback_history = vec![
        entry("2025-03-02T00:00:00Z", "1.0", "1.1"),
        entry("2025-03-01T00:00:00Z", "1.1", "1.2"),
    ];
    assert!(validate(&h).is_err());
}

#[test]
fn legacy_naive_timestamps_are_ordered_as_utc() {
    let mut h = mk_hypothesis("1.2");
    h.feedback_history = vec![
        entry("2024-01-15T10:30:00", "1.0", "1.1"),
        entry("2024-01-15T11:45:00.123456", "1.1", "1.2"),
    ];
    assert!(validate(&h).is_ok());
    assert!(parse_timestamp("2024-01-15T10:30:00").is_some());
    assert!(parse_timestamp("yesterday").is_none());
}

#[test]
fn legacy_local_time_followed_by_utc_entry_is_accepted() {
    // The naive value was local wall-clock time east of UTC; the new entry is real UTC.
    let mut h = mk_hypothesis("1.2");
    h.feedback_history = vec![
        entry("2026-10-17T08:31:39.123456", "1.0", "1.1"),
        entry("2026-10-16T23:31:39Z", "1.1", "1.2"),
    ];
    assert!(validate(&h).is_ok());
    assert!(is_naive_timestamp("2026-10-17T08:31:39.123456"));
    assert!(!is_naive_timestamp("2026-10-16T23:31:39Z"));
    assert!(!is_naive_timestamp("yesterday"));
}

#[test]
fn ordering_still_applies_within_each_timestamp_style() {
    let mut h = mk_hypothesis("1.3");
    h.feedback_history = vec![
        entry("2024-01-15T10:30:00", "1.0", "1.1"),
        entry("2026-10-16T23:31:39Z", "1.1", "1.2"),
        entry("2024-01-15T09:00:00", "1.2", "1.3"),
    ];
    assert!(validate(&h).is_err());

    h.feedback_history = vec![
        entry("2024-01-15T10:30:00", "1.0", "1.1"),
        entry("2026-10-16T23:31:39Z", "1.1", "1.2"),
        entry("2026-10-16T22:00:00Z", "1.2", "1.3"),
    ];
    assert!(validate(&h).is_err());
}

#[test]
fn updated_at_prefers_latest_feedback() {
    let mut h = mk_hypothesis("1.1");
    assert_eq!(h.updated_at(), "2025-03-01T10:00:00Z");
    h.feedback_history
        .push(entry("2025-03-04T08:00:00Z", "1.0", "1.1"));
    assert_eq!(h.updated_at(), "2025-03-04T08:00:00Z");
    assert_eq!(h.minor_version(), Some(1));
}
