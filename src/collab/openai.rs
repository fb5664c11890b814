use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::model::{Analysis, Hypothesis, Reference};

use super::Generator;

const SYSTEM_PROMPT: &str = "You are an experienced research scientist. You propose novel, \
testable hypotheses grounded in prior work and you revise them carefully when a reviewer \
gives feedback. Always answer with a single JSON object and nothing else.";

const SHAPE: &str = r#"Answer with one JSON object of this shape:
{
  "title": "short title",
  "description": "one detailed paragraph",
  "experimental_validation": "methods, controls, measurements, timeline, expected outcomes",
  "hallmarks": {
    "testability": "how the hypothesis can be falsified",
    "specificity": "how precisely it is stated",
    "grounded_knowledge": "which prior knowledge it builds on",
    "predictive_power": "which new outcomes it predicts",
    "parsimony": "why its assumptions are minimal"
  },
  "references": [ { "citation": "Author (Year). Title. Journal.", "annotation": "relevance" } ]
}"#;

/// OpenAI-compatible chat-completions client.
pub struct OpenAiGenerator {
    client: reqwest::blocking::Client,
    config: ModelConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct GeneratedHypothesis {
    title: String,
    description: String,
    #[serde(default)]
    experimental_validation: String,
    #[serde(default)]
    hallmarks: BTreeMap<String, String>,
    #[serde(default)]
    references: Vec<Reference>,
}

impl OpenAiGenerator {
    pub fn new(config: ModelConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("build http client")?;
        Ok(Self { client, config })
    }

    fn complete(&self, prompt: String) -> Result<Hypothesis> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        let req = ChatRequest {
            model: &self.config.model_name,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };
        tracing::debug!(model = %self.config.model_name, "requesting completion");
        let resp: ChatResponse = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&req)
            .send()
            .with_context(|| format!("POST {}", url))?
            .error_for_status()
            .context("model server returned an error")?
            .json()
            .context("parse completion response")?;

        let text = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("model returned no content"))?;
        parse_generated(&text)
    }
}

impl Generator for OpenAiGenerator {
    fn generate_new(&self, goal: &str, existing: &[Hypothesis]) -> Result<Hypothesis> {
        let mut prompt = format!("Research goal:\n{}\n\n", goal);
        if !existing.is_empty() {
            prompt.push_str("Hypotheses already on the table (propose something clearly different):\n");
            for h in existing {
                prompt.push_str(&format!("- {}\n", h.title));
            }
            prompt.push('\n');
        }
        prompt.push_str("Propose one new hypothesis for this goal.\n\n");
        prompt.push_str(SHAPE);
        self.complete(prompt)
    }

    fn revise(&self, goal: &str, hypothesis: &Hypothesis, feedback: &str) -> Result<Hypothesis> {
        let current = serde_json::to_string_pretty(hypothesis).context("encode hypothesis")?;
        let prompt = format!(
            "Research goal:\n{}\n\nCurrent hypothesis (v{}):\n{}\n\nReviewer feedback:\n{}\n\n\
             Revise the hypothesis to address the feedback while keeping what still holds.\n\n{}",
            goal, hypothesis.version, current, feedback, SHAPE
        );
        self.complete(prompt)
    }
}

/// Extracts the JSON object from model output, tolerating prose or code fences around it.
pub fn parse_generated(text: &str) -> Result<Hypothesis> {
    let start = text
        .find('{')
        .ok_or_else(|| anyhow!("model output contains no JSON object"))?;
    let end = text
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| anyhow!("model output contains no JSON object"))?;
    let cleaned: String = text[start..=end]
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect();
    let parsed: GeneratedHypothesis =
        serde_json::from_str(&cleaned).context("parse hypothesis JSON from model output")?;

    let analysis = Analysis::from_map(parsed.hallmarks);
    let missing = analysis.missing_keys();
    if !missing.is_empty() {
        anyhow::bail!("model output is missing hallmarks: {}", missing.join(", "));
    }

    Ok(Hypothesis::draft(
        parsed.title,
        parsed.description,
        parsed.experimental_validation,
        analysis,
        parsed.references,
    ))
}
