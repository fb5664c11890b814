use crossterm::execute;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use ratatui::backend::{Backend, CrosstermBackend};

use super::super::surface::BackendSink;
use super::lifecycle::open_session;
use super::*;

pub(in crate::tui_shell) fn run(
    opts: SessionOptions,
    collaborators: Collaborators,
) -> Result<RunSummary> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }
    let startup = open_session(&opts)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All))
        .context("enter alternate screen")?;

    let mut sink = BackendSink(CrosstermBackend::new(stdout));
    let res = match sink.size().context("read terminal size") {
        Ok(size) => {
            let mut app = App::new(startup, opts, collaborators, size);
            app.start();
            let res = event_loop::run_loop(&mut sink, &mut app);
            let saved = app.save_on_exit();
            match (res, saved) {
                (Ok(()), saved) => saved.context("save session on exit"),
                (Err(err), Ok(summary)) => {
                    tracing::info!(path = %summary.saved_to.display(), "session saved after error");
                    Err(err)
                }
                (Err(err), Err(save_err)) => {
                    Err(err.context(format!("session could not be saved: {}", save_err)))
                }
            }
        }
        Err(err) => Err(err),
    };

    disable_raw_mode().ok();
    execute!(sink.0, LeaveAlternateScreen).ok();
    sink.0.show_cursor().ok();

    res
}
