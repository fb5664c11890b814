use super::jobs::Jobs;
use super::lifecycle::Startup;
use super::status_line::StatusLine;
use super::*;

/// Owns the session and all UI state for one run. Only the UI thread touches it.
pub(in crate::tui_shell) struct App {
    pub(in crate::tui_shell) session: Session,
    pub(in crate::tui_shell) opts: SessionOptions,
    pub(in crate::tui_shell) save_path: PathBuf,

    pub(in crate::tui_shell) focus: FocusState,
    pub(in crate::tui_shell) surface: RenderSurface,
    pub(in crate::tui_shell) keys: Dispatcher,
    pub(in crate::tui_shell) show_analysis: bool,
    pub(in crate::tui_shell) show_references: bool,
    pub(in crate::tui_shell) status: StatusLine,

    pub(in crate::tui_shell) jobs: Jobs,
    pub(in crate::tui_shell) collab: Collaborators,

    // Initial generate-new requests still to be queued by `start`.
    pub(in crate::tui_shell) initial_jobs: usize,
    pub(in crate::tui_shell) notices: Vec<String>,

    pub(in crate::tui_shell) quit: bool,
}

impl App {
    pub(in crate::tui_shell) fn new(
        startup: Startup,
        opts: SessionOptions,
        collab: Collaborators,
        size: Size,
    ) -> Self {
        let status = StatusLine::new(opts.status_ttl);
        Self {
            session: startup.session,
            opts,
            save_path: startup.save_path,
            focus: FocusState::default(),
            surface: RenderSurface::new(size),
            keys: Dispatcher::default(),
            show_analysis: true,
            show_references: true,
            status,
            jobs: Jobs::new(),
            collab,
            initial_jobs: startup.generate,
            notices: startup.notices,
            quit: false,
        }
    }

    pub(in crate::tui_shell) fn selected(&self) -> Option<&Hypothesis> {
        self.session.hypotheses.get(self.focus.selected_index)
    }

    pub(in crate::tui_shell) fn selected_number(&self) -> Option<u32> {
        self.selected().map(|h| h.hypothesis_number)
    }

    pub(in crate::tui_shell) fn bounds(&self) -> Bounds {
        let list = self.surface.area(Region::List);
        let detail = self.surface.area(Region::Detail);
        Bounds {
            list_len: self.session.hypotheses.len(),
            detail_len: self.detail_lines(detail.width as usize).len(),
            list_page: list.height.saturating_sub(1) as usize,
            detail_page: detail.height.saturating_sub(1) as usize,
        }
    }

    pub(in crate::tui_shell) fn navigate(&mut self, nav: Nav) {
        let bounds = self.bounds();
        self.focus.apply(nav, bounds, &mut self.surface);
    }

    pub(in crate::tui_shell) fn clamp_focus(&mut self) {
        let bounds = self.bounds();
        self.focus.clamp(bounds);
    }

    pub(in crate::tui_shell) fn select_index(&mut self, index: usize) {
        let bounds = self.bounds();
        self.focus.select(index, bounds, &mut self.surface);
    }

    pub(in crate::tui_shell) fn touch(&mut self) {
        self.session.updated_at = now_timestamp();
    }

    pub(in crate::tui_shell) fn handle_resize(&mut self, size: Size) {
        self.surface.resize(size);
        self.clamp_focus();
    }
}
