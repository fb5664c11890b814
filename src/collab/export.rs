use std::fmt::{self, Write};
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::model::{Analysis, Hypothesis};

use super::DocumentExporter;

/// Renders a hypothesis, its analysis and its feedback trail as Markdown.
pub struct MarkdownExporter {
    out_dir: PathBuf,
}

impl MarkdownExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn file_name(hypothesis: &Hypothesis) -> String {
        let mut slug = String::new();
        for word in hypothesis
            .title
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            if !slug.is_empty() {
                slug.push('_');
            }
            slug.push_str(&word.to_lowercase());
            if slug.len() >= 50 {
                break;
            }
        }
        if slug.is_empty() {
            slug = format!("hypothesis_{}", hypothesis.hypothesis_number);
        }
        format!("{}_v{}.md", slug, hypothesis.version)
    }
}

pub(super) fn write_markdown(
    out: &mut impl Write,
    hypothesis: &Hypothesis,
    goal: &str,
) -> fmt::Result {
    writeln!(out, "# {}", hypothesis.title)?;
    writeln!(
        out,
        "\nHypothesis #{} · v{} · {} · {}\n",
        hypothesis.hypothesis_number,
        hypothesis.version,
        hypothesis.kind.label(),
        hypothesis.created_at
    )?;
    writeln!(out, "## Research goal\n\n{}\n", goal)?;
    writeln!(out, "## Hypothesis\n\n{}\n", hypothesis.body)?;
    if !hypothesis.validation_plan.is_empty() {
        writeln!(out, "## Experimental validation\n\n{}\n", hypothesis.validation_plan)?;
    }

    writeln!(out, "## Hallmarks\n")?;
    for key in Analysis::KEYS {
        let text = hypothesis.analysis.get(key).unwrap_or("");
        writeln!(out, "### {}\n\n{}\n", Analysis::heading(key), text)?;
    }

    if !hypothesis.references.is_empty() {
        writeln!(out, "## References\n")?;
        for (i, r) in hypothesis.references.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, r.citation)?;
            if !r.annotation.is_empty() {
                writeln!(out, "   - {}", r.annotation)?;
            }
        }
        writeln!(out)?;
    }

    if !hypothesis.notes.is_empty() {
        writeln!(out, "## Notes\n\n{}\n", hypothesis.notes)?;
    }

    if !hypothesis.feedback_history.is_empty() {
        writeln!(out, "## Feedback history\n")?;
        for (i, e) in hypothesis.feedback_history.iter().enumerate() {
            writeln!(
                out,
                "{}. v{} → v{} ({}): {}",
                i + 1,
                e.version_before,
                e.version_after,
                e.timestamp,
                e.feedback_text
            )?;
        }
    }
    Ok(())
}

pub(crate) fn render_markdown(hypothesis: &Hypothesis, goal: &str) -> Result<String> {
    let mut out = String::new();
    write_markdown(&mut out, hypothesis, goal).context("render markdown")?;
    Ok(out)
}

impl DocumentExporter for MarkdownExporter {
    fn render_to_document(&self, hypothesis: &Hypothesis, goal: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("create {}", self.out_dir.display()))?;
        let path = self.out_dir.join(Self::file_name(hypothesis));
        fs::write(&path, render_markdown(hypothesis, goal)?)
            .with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
