use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timestamp::parse_timestamp;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisKind {
    #[default]
    Original,
    Improvement,
    NewAlternative,
}

impl HypothesisKind {
    pub fn label(self) -> &'static str {
        match self {
            HypothesisKind::Original => "original",
            HypothesisKind::Improvement => "improved",
            HypothesisKind::NewAlternative => "alternative",
        }
    }
}

/// The five analysis ("hallmark") paragraphs attached to every hypothesis.
///
/// Stored as a map so that documents missing a key still parse and can be rejected by
/// `validate` with a precise reason.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Analysis(BTreeMap<String, String>);

impl Analysis {
    pub const KEYS: [&'static str; 5] = [
        "testability",
        "specificity",
        "grounded_knowledge",
        "predictive_power",
        "parsimony",
    ];

    pub fn new(
        testability: impl Into<String>,
        specificity: impl Into<String>,
        grounded_knowledge: impl Into<String>,
        predictive_power: impl Into<String>,
        parsimony: impl Into<String>,
    ) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("testability".to_string(), testability.into());
        fields.insert("specificity".to_string(), specificity.into());
        fields.insert("grounded_knowledge".to_string(), grounded_knowledge.into());
        fields.insert("predictive_power".to_string(), predictive_power.into());
        fields.insert("parsimony".to_string(), parsimony.into());
        Self(fields)
    }

    pub fn from_map(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn missing_keys(&self) -> Vec<&'static str> {
        Self::KEYS
            .iter()
            .copied()
            .filter(|k| !self.0.contains_key(*k))
            .collect()
    }

    pub fn heading(key: &str) -> &'static str {
        match key {
            "testability" => "Testability (Falsifiability)",
            "specificity" => "Specificity and Clarity",
            "grounded_knowledge" => "Grounded in Prior Knowledge",
            "predictive_power" => "Predictive Power & Novel Insight",
            "parsimony" => "Parsimony",
            _ => "Other",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub citation: String,
    #[serde(default)]
    pub annotation: String,
}

/// One applied piece of user feedback. Never edited after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    #[serde(rename = "feedback")]
    pub feedback_text: String,
    pub timestamp: String,
    pub version_before: String,
    pub version_after: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub hypothesis_number: u32,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: HypothesisKind,
    pub title: String,
    #[serde(rename = "description")]
    pub body: String,
    #[serde(rename = "experimental_validation", default)]
    pub validation_plan: String,
    #[serde(rename = "hallmarks")]
    pub analysis: Analysis,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub feedback_history: Vec<FeedbackEntry>,
    #[serde(rename = "generation_timestamp")]
    pub created_at: String,

    /// Fields written by other tools or older releases; carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Hypothesis {
    /// Content produced by a collaborator, before the session assigns identity.
    pub fn draft(
        title: impl Into<String>,
        body: impl Into<String>,
        validation_plan: impl Into<String>,
        analysis: Analysis,
        references: Vec<Reference>,
    ) -> Self {
        Self {
            hypothesis_number: 0,
            version: "1.0".to_string(),
            kind: HypothesisKind::Original,
            title: title.into(),
            body: body.into(),
            validation_plan: validation_plan.into(),
            analysis,
            references,
            notes: String::new(),
            feedback_history: Vec::new(),
            created_at: String::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Last moment this lineage changed: the newest feedback entry, else creation time.
    pub fn updated_at(&self) -> &str {
        self.feedback_history
            .last()
            .map(|e| e.timestamp.as_str())
            .unwrap_or(self.created_at.as_str())
    }

    pub fn updated_at_ts(&self) -> Option<time::OffsetDateTime> {
        parse_timestamp(self.updated_at())
    }

    pub fn minor_version(&self) -> Option<u64> {
        self.version
            .split_once('.')
            .and_then(|(_, minor)| minor.parse().ok())
    }
}
