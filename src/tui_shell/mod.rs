use anyhow::Result;

mod app;
mod focus;
mod input;
mod keymap;
mod surface;
mod text;

pub(crate) fn run(
    opts: crate::config::SessionOptions,
    collaborators: crate::tui::Collaborators,
) -> Result<crate::tui::RunSummary> {
    app::run(opts, collaborators)
}
