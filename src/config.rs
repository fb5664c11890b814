use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVERS_FILE: &str = "model_servers.json";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelServers {
    #[serde(default)]
    pub servers: Vec<ModelServer>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelServer {
    pub shortname: String,
    /// Literal key, or `${VAR}` to read it from the environment.
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub openai_model: String,
}

/// A resolved server entry, ready to hand to a generator client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelConfig {
    pub shortname: String,
    pub api_key: String,
    pub api_base: String,
    pub model_name: String,
}

impl ModelServers {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
    }

    pub fn resolve(&self, shortname: &str) -> Result<ModelConfig> {
        self.resolve_with(shortname, |var| std::env::var(var).ok())
    }

    pub fn resolve_with(
        &self,
        shortname: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<ModelConfig> {
        let server = self
            .servers
            .iter()
            .find(|s| s.shortname == shortname)
            .ok_or_else(|| {
                let known: Vec<&str> = self.servers.iter().map(|s| s.shortname.as_str()).collect();
                anyhow!(
                    "unknown model {:?} (configured: {})",
                    shortname,
                    if known.is_empty() {
                        "none".to_string()
                    } else {
                        known.join(", ")
                    }
                )
            })?;

        let api_key = expand_env(&server.openai_api_key, &lookup)
            .with_context(|| format!("api key for model {:?}", shortname))?;
        Ok(ModelConfig {
            shortname: server.shortname.clone(),
            api_key,
            api_base: server.openai_api_base.clone(),
            model_name: server.openai_model.clone(),
        })
    }
}

fn expand_env(raw: &str, lookup: &impl Fn(&str) -> Option<String>) -> Result<String> {
    let trimmed = raw.trim();
    let Some(var) = trimmed
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Ok(raw.to_string());
    };
    match lookup(var) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => anyhow::bail!("environment variable {} is not set", var),
    }
}

/// Everything the interactive session needs besides its collaborators.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub research_goal: String,
    /// Recorded in the session metadata.
    pub model_identifier: String,
    pub output: Option<PathBuf>,
    pub resume: Option<PathBuf>,
    pub num_hypotheses: usize,
    pub papers_dir: PathBuf,
    pub export_dir: PathBuf,
    pub poll_interval: Duration,
    pub status_ttl: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            research_goal: String::new(),
            model_identifier: String::new(),
            output: None,
            resume: None,
            num_hypotheses: 1,
            papers_dir: PathBuf::from("papers"),
            export_dir: PathBuf::from("."),
            poll_interval: Duration::from_millis(200),
            status_ttl: Duration::from_secs(3),
        }
    }
}

impl SessionOptions {
    /// Where the session is written on quit: `--output`, else the resumed file,
    /// else a fresh timestamped name.
    pub fn save_path(&self, now: time::OffsetDateTime) -> PathBuf {
        self.output
            .clone()
            .or_else(|| self.resume.clone())
            .unwrap_or_else(|| default_output_path(now))
    }
}

pub fn default_output_path(now: time::OffsetDateTime) -> PathBuf {
    PathBuf::from(format!(
        "hypotheses_{:04}{:02}{:02}_{:02}{:02}{:02}.json",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    ))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
