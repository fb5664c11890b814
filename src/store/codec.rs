use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SessionError;
use crate::model::{Hypothesis, Session, validate};

use super::migrate::migrate;

#[derive(Serialize)]
struct DocumentOut<'a> {
    metadata: MetadataOut<'a>,
    hypotheses: &'a [Hypothesis],
}

#[derive(Serialize)]
struct MetadataOut<'a> {
    session_type: &'static str,
    research_goal: &'a str,
    model_name: &'a str,
    created_at: &'a str,
    updated_at: &'a str,
    num_unique_hypotheses: usize,
    total_feedback_entries: usize,
    hypothesis_types: TypeCounts,
}

#[derive(Serialize)]
struct TypeCounts {
    original: usize,
    improvements: usize,
    new_alternatives: usize,
}

#[derive(Default, Deserialize)]
struct MetadataIn {
    #[serde(default)]
    research_goal: String,
    #[serde(default)]
    model_name: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
}

/// A decoded session plus the records that had to be left out.
#[derive(Debug)]
pub struct Decoded {
    pub session: Session,
    pub rejected: Vec<SessionError>,
}

pub fn serialize(session: &Session) -> Result<Vec<u8>, SessionError> {
    let counts = session.kind_counts();
    let doc = DocumentOut {
        metadata: MetadataOut {
            session_type: "interactive",
            research_goal: &session.research_goal,
            model_name: &session.model_identifier,
            created_at: &session.created_at,
            updated_at: &session.updated_at,
            num_unique_hypotheses: session.hypotheses.len(),
            total_feedback_entries: session.total_feedback_entries(),
            hypothesis_types: TypeCounts {
                original: counts.original,
                improvements: counts.improvements,
                new_alternatives: counts.new_alternatives,
            },
        },
        hypotheses: &session.hypotheses,
    };
    let mut bytes = serde_json::to_vec_pretty(&doc)
        .map_err(|err| SessionError::CorruptSession(format!("encode session: {}", err)))?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn deserialize(bytes: &[u8]) -> Result<Session, SessionError> {
    decode(bytes).map(|d| d.session)
}

/// Parses, migrates and validates a session document.
///
/// Individual records that fail are collected in `rejected`; only a document that is not
/// a session at all fails as a whole.
pub fn decode(bytes: &[u8]) -> Result<Decoded, SessionError> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}');
    let raw: Value = serde_json::from_str(text)
        .map_err(|err| SessionError::CorruptSession(format!("parse: {}", err)))?;

    let doc = migrate(raw);
    let Value::Object(mut root) = doc else {
        return Err(SessionError::CorruptSession(
            "top level is not an object".to_string(),
        ));
    };

    let metadata: MetadataIn = match root.remove("metadata") {
        None | Some(Value::Null) => MetadataIn::default(),
        Some(v) => serde_json::from_value(v)
            .map_err(|err| SessionError::CorruptSession(format!("metadata: {}", err)))?,
    };

    let items = match root.remove("hypotheses") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(SessionError::CorruptSession(
                "`hypotheses` is not an array".to_string(),
            ));
        }
    };

    let mut hypotheses = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        let parsed = serde_json::from_value::<Hypothesis>(item)
            .map_err(|err| SessionError::InvalidEntity(format!("record {}: {}", i, err)))
            .and_then(|h| validate(&h).map(|()| h));
        match parsed {
            Ok(h) => hypotheses.push(h),
            Err(err) => {
                tracing::warn!(record = i, error = %err, "rejected hypothesis while loading");
                rejected.push(err);
            }
        }
    }

    Ok(Decoded {
        session: Session {
            research_goal: metadata.research_goal,
            model_identifier: metadata.model_name,
            created_at: metadata.created_at,
            updated_at: metadata.updated_at,
            hypotheses,
        },
        rejected,
    })
}
