use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use conjecture::collab::{
    Generator, MarkdownExporter, OpenAiGenerator, SemanticScholar, UnavailableGenerator,
};
use conjecture::config::{DEFAULT_SERVERS_FILE, ModelServers, SessionOptions};
use conjecture::logging::{self, DEFAULT_LOG_FILE};
use conjecture::tui::{self, Collaborators};

#[derive(Parser)]
#[command(name = "conjecture")]
#[command(about = "Interactive workbench for generating and refining research hypotheses", long_about = None)]
pub(crate) struct Cli {
    /// File containing the research goal
    #[arg(value_name = "GOAL_FILE", conflicts_with = "goal")]
    goal_file: Option<PathBuf>,

    /// Research goal text
    #[arg(long)]
    goal: Option<String>,

    /// Model server shortname from the servers file
    #[arg(long)]
    model: Option<String>,

    /// Model servers file
    #[arg(long, default_value = DEFAULT_SERVERS_FILE)]
    config: PathBuf,

    /// Where to save the session on quit
    #[arg(long)]
    output: Option<PathBuf>,

    /// Continue a saved session
    #[arg(long, value_name = "PATH")]
    resume: Option<PathBuf>,

    /// Hypotheses to generate when starting a new session
    #[arg(long, default_value_t = 1)]
    num_hypotheses: usize,

    /// Directory for fetched abstracts
    #[arg(long, default_value = "papers")]
    papers_dir: PathBuf,

    /// Directory for exported documents
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn read_goal(cli: &Cli) -> Result<String> {
    if let Some(path) = &cli.goal_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read goal file {}", path.display()))?;
        return Ok(text.trim().to_string());
    }
    Ok(cli.goal.as_deref().unwrap_or("").trim().to_string())
}

fn build_generator(model: Option<&str>, config: &Path) -> Result<(Arc<dyn Generator>, String)> {
    let Some(name) = model else {
        tracing::warn!("no model selected; generation is unavailable");
        return Ok((Arc::new(UnavailableGenerator), String::new()));
    };
    let servers = ModelServers::load(config)?;
    let cfg = servers.resolve(name)?;
    let model_name = cfg.model_name.clone();
    let generator = OpenAiGenerator::new(cfg).context("build model client")?;
    Ok((Arc::new(generator), model_name))
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();

    let research_goal = read_goal(&cli)?;
    if research_goal.is_empty() && cli.resume.is_none() {
        anyhow::bail!("a research goal is required (GOAL_FILE or --goal) unless --resume is given");
    }

    logging::init(&cli.log_file)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let (generator, model_identifier) = build_generator(cli.model.as_deref(), &cli.config)?;
    let api_key = std::env::var("S2_API_KEY").ok().filter(|k| !k.is_empty());
    let collaborators = Collaborators {
        generator,
        fetcher: Arc::new(SemanticScholar::new(api_key)?),
        exporter: Box::new(MarkdownExporter::new(cli.export_dir.clone())),
    };

    let opts = SessionOptions {
        research_goal,
        model_identifier,
        output: cli.output,
        resume: cli.resume,
        num_hypotheses: cli.num_hypotheses,
        papers_dir: cli.papers_dir,
        export_dir: cli.export_dir,
        ..SessionOptions::default()
    };

    let summary = tui::run(opts, collaborators)?;
    println!(
        "Saved {} hypotheses ({} feedback entries) to {}",
        summary.hypotheses,
        summary.feedback_entries,
        summary.saved_to.display()
    );
    Ok(())
}
