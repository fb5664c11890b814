use super::*;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub(in crate::tui_shell) struct StatusMessage {
    pub(in crate::tui_shell) text: String,
    pub(in crate::tui_shell) error: bool,
    shown_at: Instant,
}

/// Transient one-line messages plus the background-work spinner.
pub(in crate::tui_shell) struct StatusLine {
    message: Option<StatusMessage>,
    ttl: Duration,
    spinner: usize,
}

impl StatusLine {
    pub(in crate::tui_shell) fn new(ttl: Duration) -> Self {
        Self {
            message: None,
            ttl,
            spinner: 0,
        }
    }

    pub(in crate::tui_shell) fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub(in crate::tui_shell) fn show(&mut self, text: String, error: bool, now: Instant) {
        self.message = Some(StatusMessage {
            text,
            error,
            shown_at: now,
        });
    }

    pub(in crate::tui_shell) fn spinner(&self) -> &'static str {
        SPINNER[self.spinner % SPINNER.len()]
    }

    /// Expires old messages and advances the spinner. Returns whether the line changed.
    pub(in crate::tui_shell) fn tick(&mut self, now: Instant, busy: bool) -> bool {
        let mut changed = false;
        if self
            .message
            .as_ref()
            .is_some_and(|m| now.duration_since(m.shown_at) >= self.ttl)
        {
            self.message = None;
            changed = true;
        }
        if busy {
            self.spinner = self.spinner.wrapping_add(1);
            changed = true;
        }
        changed
    }
}

impl App {
    pub(in crate::tui_shell) fn set_status(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(status = %text, "status");
        self.status.show(text, false, Instant::now());
        self.surface.mark_dirty(Region::Status);
    }

    pub(in crate::tui_shell) fn set_error(&mut self, err: impl std::fmt::Display) {
        let text = err.to_string();
        tracing::warn!(error = %text, "status error");
        self.status.show(text, true, Instant::now());
        self.surface.mark_dirty(Region::Status);
    }

    pub(in crate::tui_shell) fn tick(&mut self, now: Instant) {
        if self.status.tick(now, self.jobs.in_flight() > 0) {
            self.surface.mark_dirty(Region::Status);
        }
    }
}
