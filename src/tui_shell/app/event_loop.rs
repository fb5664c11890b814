use super::*;

/// Drain finished work, expire status, repaint what changed, then wait for input.
pub(in crate::tui_shell) fn run_loop<S: GridSink>(sink: &mut S, app: &mut App) -> Result<()> {
    loop {
        app.poll_jobs();
        app.tick(Instant::now());

        // The terminal may have changed size between the resize event and this frame.
        let size = sink.size().context("read terminal size")?;
        if size != app.surface.size() {
            app.handle_resize(size);
        }
        app.redraw(sink).context("draw")?;

        if app.quit {
            return Ok(());
        }

        if event::poll(app.opts.poll_interval).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => app.handle_key(k),
                Event::Resize(width, height) => app.handle_resize(Size::new(width, height)),
                _ => {}
            }
        }
    }
}
