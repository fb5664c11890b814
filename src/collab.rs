//! Narrow contracts to the external systems the session drives.
//!
//! The shell only ever talks to these traits; the concrete clients live in submodules.

use std::path::PathBuf;

use anyhow::Result;

use crate::model::Hypothesis;

mod export;
mod openai;
mod scholar;

pub use self::export::MarkdownExporter;
pub use self::openai::{OpenAiGenerator, parse_generated};
pub use self::scholar::{SemanticScholar, citation_query, save_abstracts};

/// Produces hypothesis content. Returned records are drafts: the caller assigns
/// number, version and history.
pub trait Generator: Send + Sync {
    fn generate_new(&self, goal: &str, existing: &[Hypothesis]) -> Result<Hypothesis>;
    fn revise(&self, goal: &str, hypothesis: &Hypothesis, feedback: &str) -> Result<Hypothesis>;
}

pub trait DocumentExporter {
    fn render_to_document(&self, hypothesis: &Hypothesis, goal: &str) -> Result<PathBuf>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedPaper {
    pub citation: String,
    pub title: String,
    pub year: Option<u32>,
    pub authors: Vec<String>,
    pub url: Option<String>,
    pub abstract_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(FetchedPaper),
    NotFound { citation: String, reason: Option<String> },
}

/// Looks up citations in a bibliographic catalog. One outcome per citation, in order;
/// a failing citation never aborts the batch.
pub trait ReferenceFetcher: Send + Sync {
    fn fetch_references(&self, citations: &[String]) -> Vec<FetchOutcome>;
}

/// Stand-in used when no model server is configured.
pub struct UnavailableGenerator;

impl Generator for UnavailableGenerator {
    fn generate_new(&self, _goal: &str, _existing: &[Hypothesis]) -> Result<Hypothesis> {
        anyhow::bail!("no model configured (start with --model)")
    }

    fn revise(&self, _goal: &str, _hypothesis: &Hypothesis, _feedback: &str) -> Result<Hypothesis> {
        anyhow::bail!("no model configured (start with --model)")
    }
}

#[cfg(test)]
#[path = "tests/collab_tests.rs"]
mod tests;
