use super::*;

/// What the session starts from, resolved before the terminal is taken over.
pub(in crate::tui_shell) struct Startup {
    pub(in crate::tui_shell) session: Session,
    pub(in crate::tui_shell) save_path: PathBuf,
    pub(in crate::tui_shell) generate: usize,
    pub(in crate::tui_shell) notices: Vec<String>,
}

pub(in crate::tui_shell) fn open_session(opts: &SessionOptions) -> Result<Startup> {
    let now = time::OffsetDateTime::now_utc();
    let save_path = opts.save_path(now);

    let Some(resume) = &opts.resume else {
        let session = Session::new(
            opts.research_goal.trim(),
            opts.model_identifier.clone(),
            &now_timestamp(),
        );
        return Ok(Startup {
            session,
            save_path,
            generate: opts.num_hypotheses,
            notices: Vec::new(),
        });
    };

    let decoded =
        store::read_session(resume).with_context(|| format!("resume {}", resume.display()))?;
    let mut session = decoded.session;
    if !opts.research_goal.trim().is_empty() {
        session.research_goal = opts.research_goal.trim().to_string();
    }
    if session.model_identifier.is_empty() {
        session.model_identifier = opts.model_identifier.clone();
    }

    let mut notices = Vec::new();
    if !decoded.rejected.is_empty() {
        notices.push(format!(
            "{} record(s) in {} were rejected (see log)",
            decoded.rejected.len(),
            resume.display()
        ));
    }
    Ok(Startup {
        session,
        save_path,
        generate: 0,
        notices,
    })
}

impl App {
    /// Merges a session file into the current one. The loaded goal wins when it is set.
    pub(in crate::tui_shell) fn load_and_merge(&mut self, path: &Path) {
        let decoded = match store::read_session(path) {
            Ok(d) => d,
            Err(err) => {
                self.set_error(err);
                return;
            }
        };
        let loaded = decoded.session;
        let outcome = store::merge(&self.session.hypotheses, &loaded.hypotheses);
        for warning in &outcome.warnings {
            tracing::warn!(path = %path.display(), "{}", warning);
        }

        self.session.hypotheses = outcome.hypotheses;
        if !loaded.research_goal.trim().is_empty() {
            self.session.research_goal = loaded.research_goal;
        }
        if self.session.model_identifier.is_empty() {
            self.session.model_identifier = loaded.model_identifier;
        }
        self.touch();
        self.clamp_focus();
        self.surface.mark_all_dirty();

        let mut msg = format!(
            "loaded {}: {} added, {} replaced",
            path.display(),
            outcome.added,
            outcome.replaced
        );
        if !decoded.rejected.is_empty() {
            msg.push_str(&format!(", {} rejected", decoded.rejected.len()));
        }
        match outcome.warnings.first() {
            Some(first) if outcome.warnings.len() == 1 => {
                self.set_error(format!("{}; {}", msg, first));
            }
            Some(_) => self.set_error(format!(
                "{}; {} histories diverged (see log)",
                msg,
                outcome.warnings.len()
            )),
            None if !decoded.rejected.is_empty() => self.set_error(msg),
            None => self.set_status(msg),
        }
    }

    pub(in crate::tui_shell) fn save_as(&mut self, path: &Path) {
        let path = store::with_session_extension(path);
        self.touch();
        match store::write_session(&path, &self.session) {
            Ok(()) => {
                self.set_status(format!("saved to {}", path.display()));
                self.save_path = path;
                self.surface.mark_dirty(Region::Header);
            }
            Err(err) => self.set_error(err),
        }
    }

    /// The mandatory save on quit. Failures are returned, never swallowed.
    pub(in crate::tui_shell) fn save_on_exit(&mut self) -> Result<RunSummary, SessionError> {
        self.touch();
        store::write_session(&self.save_path, &self.session)?;
        Ok(RunSummary {
            saved_to: self.save_path.clone(),
            hypotheses: self.session.hypotheses.len(),
            feedback_entries: self.session.total_feedback_entries(),
        })
    }
}
