use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::collab::{DocumentExporter, Generator, ReferenceFetcher};
use crate::config::SessionOptions;

/// External systems the interactive session drives.
pub struct Collaborators {
    pub generator: Arc<dyn Generator>,
    pub fetcher: Arc<dyn ReferenceFetcher>,
    pub exporter: Box<dyn DocumentExporter>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub saved_to: PathBuf,
    pub hypotheses: usize,
    pub feedback_entries: usize,
}

/// Runs the interactive session until the user quits, then saves it.
pub fn run(opts: SessionOptions, collaborators: Collaborators) -> Result<RunSummary> {
    crate::tui_shell::run(opts, collaborators)
}
