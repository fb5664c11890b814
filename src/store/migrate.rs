use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value, json};

use crate::model::EPOCH_TIMESTAMP;

/// Brings a parsed session document up to the current schema.
///
/// Pure and idempotent: a document that already satisfies the schema comes back unchanged.
/// Shapes it does not recognise are returned as-is for the decoder to reject.
pub fn migrate(doc: Value) -> Value {
    let mut doc = match doc {
        Value::Array(items) => json!({ "metadata": {}, "hypotheses": items }),
        other => other,
    };

    let Some(root) = doc.as_object_mut() else {
        return doc;
    };

    let fallback_ts = migrate_metadata(root);

    if let Some(Value::Array(items)) = root.get_mut("hypotheses") {
        assign_missing_numbers(items);
        for item in items.iter_mut() {
            if let Some(h) = item.as_object_mut() {
                migrate_hypothesis(h, &fallback_ts);
            }
        }
        collapse_versions(items);
    }

    doc
}

/// Returns the timestamp used for records that carry none.
fn migrate_metadata(root: &mut Map<String, Value>) -> String {
    let meta = root
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(meta) = meta.as_object_mut() else {
        return EPOCH_TIMESTAMP.to_string();
    };

    if !meta.contains_key("model_name")
        && let Some(model) = meta.get("model").cloned()
    {
        meta.insert("model_name".to_string(), model);
    }

    let legacy_ts = meta.get("timestamp").and_then(Value::as_str).map(str::to_string);
    if let Some(ts) = legacy_ts.as_deref() {
        for key in ["created_at", "updated_at"] {
            if !meta.contains_key(key) {
                meta.insert(key.to_string(), Value::String(ts.to_string()));
            }
        }
    }

    meta.get("created_at")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| EPOCH_TIMESTAMP.to_string())
}

fn assign_missing_numbers(items: &mut [Value]) {
    let mut next = items
        .iter()
        .filter_map(|v| v.get("hypothesis_number").and_then(Value::as_u64))
        .max()
        .unwrap_or(0)
        + 1;
    for item in items.iter_mut() {
        if let Some(h) = item.as_object_mut()
            && !h.contains_key("hypothesis_number")
        {
            h.insert("hypothesis_number".to_string(), json!(next));
            next += 1;
        }
    }
}

fn migrate_hypothesis(h: &mut Map<String, Value>, fallback_ts: &str) {
    if !h.contains_key("version") {
        h.insert("version".to_string(), json!("1.0"));
    }
    let kind = h.get("type").and_then(Value::as_str).map(str::to_string);
    match kind.as_deref() {
        None => {
            h.insert("type".to_string(), json!("original"));
        }
        Some("revision") => {
            h.insert("type".to_string(), json!("improvement"));
        }
        Some(_) => {}
    }
    if !h.contains_key("generation_timestamp") {
        h.insert("generation_timestamp".to_string(), json!(fallback_ts));
    }

    if !h.contains_key("feedback_history") {
        let mut history = Vec::new();
        let legacy = h
            .get("user_feedback")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(text) = legacy {
            history.push(json!({
                "feedback": text,
                "timestamp": h.get("generation_timestamp").cloned().unwrap_or(json!(fallback_ts)),
                "version_before": "1.0",
                "version_after": h.get("version").cloned().unwrap_or(json!("1.1")),
            }));
        }
        h.insert("feedback_history".to_string(), Value::Array(history));
    }

    if let Some(Value::Array(entries)) = h.get_mut("feedback_history") {
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            if entry.contains_key("feedback") {
                continue;
            }
            let improvements = entry
                .get("improvements")
                .and_then(Value::as_str)
                .unwrap_or("no details recorded");
            let text = format!("[automated revision] {}", improvements);
            entry.insert("feedback".to_string(), Value::String(text));
        }
    }

    if !h.contains_key("notes") {
        h.insert("notes".to_string(), json!(""));
    }
}

fn minor_of(v: &Value) -> u64 {
    v.get("version")
        .and_then(Value::as_str)
        .and_then(|s| s.split_once('.'))
        .and_then(|(_, minor)| minor.parse().ok())
        .unwrap_or(0)
}

/// Older writers stored every version as its own record. Fold each number into its newest
/// record, at the position where that number first appeared, carrying the feedback of every
/// earlier version along.
fn collapse_versions(items: &mut Vec<Value>) {
    let mut groups: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
    for (i, item) in items.iter().enumerate() {
        if let Some(num) = item.get("hypothesis_number").and_then(Value::as_u64) {
            groups.entry(num).or_default().push(i);
        }
    }
    if groups.values().all(|g| g.len() == 1) {
        return;
    }

    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(groups.len());
    for item in items.iter() {
        let Some(num) = item.get("hypothesis_number").and_then(Value::as_u64) else {
            out.push(item.clone());
            continue;
        };
        if !seen.insert(num) {
            continue;
        }
        let records: Vec<&Value> = groups[&num].iter().map(|&i| &items[i]).collect();
        out.push(fold_lineage(records));
    }
    *items = out;
}

/// Chains the histories of one lineage's per-version records, oldest version first.
///
/// An entry closing a record's own version gets the previous record's version as
/// `version_before`; entries already seen for the same `version_after` are skipped.
fn fold_lineage(mut records: Vec<&Value>) -> Value {
    records.sort_by_key(|r| minor_of(r));

    let mut history: Vec<Value> = Vec::new();
    let mut prev_version: Option<Value> = None;
    for record in &records {
        let version = record.get("version").cloned().unwrap_or_else(|| json!("1.0"));
        let entries = record
            .get("feedback_history")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for mut entry in entries {
            let after = entry.get("version_after").cloned();
            if history
                .iter()
                .any(|e| e.get("version_after") == after.as_ref())
            {
                continue;
            }
            if after.as_ref() == Some(&version)
                && let (Some(prev), Some(fields)) = (&prev_version, entry.as_object_mut())
            {
                fields.insert("version_before".to_string(), prev.clone());
            }
            history.push(entry);
        }
        prev_version = Some(version);
    }

    let mut newest = records.last().map(|r| (*r).clone()).unwrap_or(Value::Null);
    if let Some(fields) = newest.as_object_mut() {
        fields.insert("feedback_history".to_string(), Value::Array(history));
    }
    newest
}
