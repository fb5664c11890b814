use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn hallmarks() -> serde_json::Value {
    json!({
        "testability": "t",
        "specificity": "s",
        "grounded_knowledge": "g",
        "predictive_power": "p",
        "parsimony": "pa"
    })
}

fn legacy_doc() -> serde_json::Value {
    json!({
        "metadata": {
            "session_type": "interactive",
            "research_goal": "Why do bees dance?",
            "model": "scout",
            "timestamp": "2024-01-15T09:00:00"
        },
        "hypotheses": [
            {
                "title": "Dance encodes distance",
                "description": "Waggle duration maps to distance.",
                "experimental_validation": "Vary feeder distance.",
                "hallmarks": hallmarks(),
                "references": [],
                "version": "1.0",
                "type": "original",
                "hypothesis_number": 1,
                "generation_timestamp": "2024-01-15T09:05:00"
            },
            {
                "title": "Dance encodes distance and wind",
                "description": "Wind modulates waggle duration.",
                "experimental_validation": "Use a wind tunnel.",
                "hallmarks": hallmarks(),
                "references": [],
                "version": "1.1",
                "type": "improvement",
                "hypothesis_number": 1,
                "user_feedback": "consider wind",
                "generation_timestamp": "2024-01-15T09:30:00",
                "theory_and_computation": "Agent-based flight model."
            }
        ]
    })
}

#[test]
fn legacy_user_feedback_becomes_single_history_entry() {
    let migrated = migrate(legacy_doc());
    let items = migrated["hypotheses"].as_array().unwrap();
    assert_eq!(items.len(), 1, "versions collapse into one lineage record");

    let h = &items[0];
    assert_eq!(h["version"], "1.1");
    assert_eq!(h["notes"], "");
    assert_eq!(
        h["feedback_history"],
        json!([{
            "feedback": "consider wind",
            "timestamp": "2024-01-15T09:30:00",
            "version_before": "1.0",
            "version_after": "1.1"
        }])
    );
}

#[test]
fn per_version_records_chain_their_feedback() {
    let record = |version: &str, feedback: Option<&str>, at: &str| {
        let mut r = json!({
            "title": format!("Dance v{}", version),
            "description": "d",
            "experimental_validation": "e",
            "hallmarks": hallmarks(),
            "references": [],
            "version": version,
            "hypothesis_number": 1,
            "generation_timestamp": at
        });
        if let Some(text) = feedback {
            r["user_feedback"] = json!(text);
        }
        r
    };
    let doc = json!({
        "metadata": { "research_goal": "Why do bees dance?" },
        "hypotheses": [
            record("1.0", None, "2024-01-15T09:05:00"),
            record("1.2", Some("B"), "2024-01-15T09:50:00"),
            record("1.1", Some("A"), "2024-01-15T09:30:00"),
        ]
    });

    let migrated = migrate(doc);
    let items = migrated["hypotheses"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["version"], "1.2");
    assert_eq!(
        items[0]["feedback_history"],
        json!([
            {
                "feedback": "A",
                "timestamp": "2024-01-15T09:30:00",
                "version_before": "1.0",
                "version_after": "1.1"
            },
            {
                "feedback": "B",
                "timestamp": "2024-01-15T09:50:00",
                "version_before": "1.1",
                "version_after": "1.2"
            }
        ])
    );
    assert_eq!(migrate(migrated.clone()), migrated);

    let session = deserialize(&serde_json::to_vec(&migrated).unwrap()).unwrap();
    let texts: Vec<&str> = session.hypotheses[0]
        .feedback_history
        .iter()
        .map(|e| e.feedback_text.as_str())
        .collect();
    assert_eq!(texts, vec!["A", "B"]);
}

#[test]
fn migration_is_idempotent() {
    let once = migrate(legacy_doc());
    let twice = migrate(once.clone());
    assert_eq!(once, twice);

    let bare = json!([{ "title": "x", "description": "y", "hallmarks": hallmarks() }]);
    let once = migrate(bare);
    assert_eq!(migrate(once.clone()), once);
}

#[test]
fn metadata_legacy_keys_are_mapped() {
    let migrated = migrate(legacy_doc());
    let meta = &migrated["metadata"];
    assert_eq!(meta["model_name"], "scout");
    assert_eq!(meta["created_at"], "2024-01-15T09:00:00");
    assert_eq!(meta["updated_at"], "2024-01-15T09:00:00");
}

#[test]
fn bare_array_gets_numbers_and_defaults() {
    let migrated = migrate(json!([
        { "title": "a", "description": "a", "hallmarks": hallmarks(), "hypothesis_number": 4 },
        { "title": "b", "description": "b", "hallmarks": hallmarks() }
    ]));
    let items = migrated["hypotheses"].as_array().unwrap();
    assert_eq!(items[0]["hypothesis_number"], 4);
    assert_eq!(items[1]["hypothesis_number"], 5);
    assert_eq!(items[1]["version"], "1.0");
    assert_eq!(items[1]["type"], "original");
    assert_eq!(items[1]["feedback_history"], json!([]));
}

#[test]
fn automated_revision_entries_get_feedback_text() {
    let migrated = migrate(json!({
        "metadata": {},
        "hypotheses": [{
            "title": "a", "description": "a", "hallmarks": hallmarks(),
            "hypothesis_number": 1, "version": "1.1", "type": "revision",
            "generation_timestamp": "2024-02-01T00:00:00",
            "feedback_history": [{
                "revision_type": "automated_improvement",
                "timestamp": "2024-02-01T00:00:00",
                "version_before": "1.0",
                "version_after": "1.1",
                "improvements": "sharper predictions"
            }]
        }]
    }));
    let h = &migrated["hypotheses"][0];
    assert_eq!(h["type"], "improvement");
    assert_eq!(
        h["feedback_history"][0]["feedback"],
        "[automated revision] sharper predictions"
    );
}

#[test]
fn decode_keeps_unknown_fields_and_rejects_bad_records() {
    let mut doc = legacy_doc();
    doc["hypotheses"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "title": "no hallmarks", "description": "d", "hypothesis_number": 9 }));
    let bytes = serde_json::to_vec(&doc).unwrap();

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.session.hypotheses.len(), 1);
    assert_eq!(decoded.rejected.len(), 1);
    assert_eq!(decoded.session.research_goal, "Why do bees dance?");
    assert_eq!(decoded.session.model_identifier, "scout");

    let h = &decoded.session.hypotheses[0];
    assert_eq!(
        h.extra.get("theory_and_computation"),
        Some(&json!("Agent-based flight model."))
    );
    assert_eq!(h.feedback_history.len(), 1);
    assert_eq!(h.feedback_history[0].version_before, "1.0");
}

#[test]
fn unparsable_payloads_are_corrupt() {
    let cases: [&[u8]; 3] = [b"{not json", b"42", b"{\"hypotheses\": {}}"];
    for bad in cases {
        assert!(matches!(
            decode(bad),
            Err(crate::error::SessionError::CorruptSession(_))
        ));
    }
}

#[test]
fn invalid_utf8_is_replaced_not_fatal() {
    let mut bytes = br#"{"metadata": {"research_goal": "caf"#.to_vec();
    bytes.push(0xff);
    bytes.extend_from_slice(br#""}, "hypotheses": []}"#);
    let session = deserialize(&bytes).unwrap();
    assert_eq!(session.research_goal, "caf\u{fffd}");
}
