//! Background collaborator calls. Workers never touch the session: each one sends a single
//! immutable outcome back, and the UI thread applies it on its next loop iteration.

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) struct FetchSummary {
    pub(in crate::tui_shell) found: usize,
    pub(in crate::tui_shell) missing: usize,
    pub(in crate::tui_shell) written: usize,
}

pub(in crate::tui_shell) enum JobOutcome {
    Generated {
        kind: HypothesisKind,
        result: Result<Hypothesis, SessionError>,
    },
    Revised {
        pending: PendingFeedback,
        result: Result<Hypothesis, SessionError>,
    },
    Fetched {
        number: u32,
        dir: PathBuf,
        result: Result<FetchSummary, SessionError>,
    },
}

pub(in crate::tui_shell) struct Jobs {
    tx: Sender<JobOutcome>,
    rx: Receiver<JobOutcome>,
    revising: HashSet<u32>,
    in_flight: usize,
}

impl Jobs {
    pub(in crate::tui_shell) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            revising: HashSet::new(),
            in_flight: 0,
        }
    }

    pub(in crate::tui_shell) fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub(in crate::tui_shell) fn is_revising(&self, number: u32) -> bool {
        self.revising.contains(&number)
    }

    fn spawn(
        &mut self,
        name: &str,
        work: impl FnOnce() -> JobOutcome + Send + 'static,
    ) -> Result<(), SessionError> {
        let tx = self.tx.clone();
        std::thread::Builder::new()
            .name(format!("job-{}", name))
            .spawn(move || {
                // The receiver only goes away when the app is shutting down.
                let _ = tx.send(work());
            })
            .map_err(|err| SessionError::CollaboratorFailure(format!("start worker: {}", err)))?;
        self.in_flight += 1;
        Ok(())
    }

    fn try_next(&mut self) -> Option<JobOutcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    #[cfg(test)]
    pub(in crate::tui_shell) fn wait_next(&mut self, timeout: Duration) -> Option<JobOutcome> {
        let outcome = self.rx.recv_timeout(timeout).ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }
}

impl App {
    /// Queues the generate-new requests the session was started with.
    pub(in crate::tui_shell) fn start(&mut self) {
        for notice in std::mem::take(&mut self.notices) {
            self.set_error(notice);
        }
        for _ in 0..std::mem::take(&mut self.initial_jobs) {
            if let Err(err) = self.request_new(HypothesisKind::Original) {
                self.set_error(err);
                break;
            }
        }
    }

    pub(in crate::tui_shell) fn request_new(
        &mut self,
        kind: HypothesisKind,
    ) -> Result<(), SessionError> {
        let generator = Arc::clone(&self.collab.generator);
        let goal = self.session.research_goal.clone();
        let existing = self.session.hypotheses.clone();
        self.jobs.spawn("generate", move || JobOutcome::Generated {
            kind,
            result: generator
                .generate_new(&goal, &existing)
                .map_err(SessionError::collaborator),
        })?;
        tracing::info!(kind = ?kind, "generation requested");
        self.surface.mark_dirty(Region::Status);
        Ok(())
    }

    /// One revision per lineage at a time; a second request is refused, not queued.
    pub(in crate::tui_shell) fn request_revision(
        &mut self,
        number: u32,
        feedback_text: &str,
    ) -> Result<(), SessionError> {
        if self.jobs.is_revising(number) {
            tracing::info!(number, "revision refused: busy");
            return Err(SessionError::Busy(number));
        }
        let current = self
            .session
            .get(number)
            .cloned()
            .ok_or_else(|| SessionError::InvalidEntity(format!("no hypothesis #{}", number)))?;
        let pending = record_feedback(&current, feedback_text, &now_timestamp())?;

        let generator = Arc::clone(&self.collab.generator);
        let goal = self.session.research_goal.clone();
        let text = pending.feedback_text.clone();
        self.jobs.spawn("revise", move || JobOutcome::Revised {
            result: generator
                .revise(&goal, &current, &text)
                .map_err(SessionError::collaborator),
            pending,
        })?;
        self.jobs.revising.insert(number);
        tracing::info!(number, "revision requested");
        self.surface.mark_dirty(Region::List);
        self.surface.mark_dirty(Region::Status);
        Ok(())
    }

    pub(in crate::tui_shell) fn request_fetch(&mut self, number: u32) -> Result<(), SessionError> {
        let hypothesis = self
            .session
            .get(number)
            .ok_or_else(|| SessionError::InvalidEntity(format!("no hypothesis #{}", number)))?;
        let citations: Vec<String> = hypothesis
            .references
            .iter()
            .map(|r| r.citation.clone())
            .filter(|c| !c.trim().is_empty())
            .collect();
        if citations.is_empty() {
            return Err(SessionError::InvalidEntity(format!(
                "#{} has no references",
                number
            )));
        }

        let stem = self
            .save_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "session".to_string());
        let dir = self.opts.papers_dir.join(stem);
        let fetcher = Arc::clone(&self.collab.fetcher);
        let target = dir.clone();
        self.jobs.spawn("fetch", move || {
            let outcomes = fetcher.fetch_references(&citations);
            let found = outcomes
                .iter()
                .filter(|o| matches!(o, crate::collab::FetchOutcome::Found(_)))
                .count();
            let result = crate::collab::save_abstracts(&target, &outcomes)
                .map(|written| FetchSummary {
                    found,
                    missing: outcomes.len() - found,
                    written,
                })
                .map_err(SessionError::collaborator);
            JobOutcome::Fetched {
                number,
                dir: target,
                result,
            }
        })?;
        tracing::info!(number, dir = %dir.display(), "reference fetch requested");
        self.surface.mark_dirty(Region::Status);
        Ok(())
    }

    pub(in crate::tui_shell) fn poll_jobs(&mut self) {
        while let Some(outcome) = self.jobs.try_next() {
            self.apply_outcome(outcome);
        }
    }

    pub(in crate::tui_shell) fn apply_outcome(&mut self, outcome: JobOutcome) {
        self.surface.mark_dirty(Region::Status);
        match outcome {
            JobOutcome::Generated { kind, result } => self.apply_generated(kind, result),
            JobOutcome::Revised { pending, result } => self.apply_revised(pending, result),
            JobOutcome::Fetched {
                number,
                dir,
                result,
            } => match result {
                Ok(s) => {
                    tracing::info!(number, found = s.found, missing = s.missing, "references fetched");
                    self.set_status(format!(
                        "#{}: saved {} abstract(s) to {} ({} not found)",
                        number,
                        s.written,
                        dir.display(),
                        s.missing
                    ));
                }
                Err(err) => self.set_error(format!("#{}: fetch failed: {}", number, err)),
            },
        }
    }

    fn apply_generated(&mut self, kind: HypothesisKind, result: Result<Hypothesis, SessionError>) {
        let draft = match result {
            Ok(h) => h,
            Err(err) => {
                self.set_error(format!("generation failed: {}", err));
                return;
            }
        };
        let was_empty = self.session.hypotheses.is_empty();
        let number = self.session.next_number();
        let hypothesis = start_lineage(draft, number, kind, &now_timestamp());
        if let Err(err) = validate(&hypothesis) {
            self.set_error(err);
            return;
        }

        let index = self.session.upsert(hypothesis);
        self.touch();
        tracing::info!(number, kind = ?kind, "hypothesis generated");
        self.surface.mark_dirty(Region::Header);
        self.surface.mark_dirty(Region::List);
        if was_empty || kind == HypothesisKind::NewAlternative {
            self.select_index(index);
        }
        self.set_status(format!("generated hypothesis #{}", number));
    }

    fn apply_revised(&mut self, pending: PendingFeedback, result: Result<Hypothesis, SessionError>) {
        let number = pending.hypothesis_number;
        self.jobs.revising.remove(&number);
        // The lineage may no longer be on screen; the list still shows its new version.
        self.surface.mark_dirty(Region::List);

        let revised = match result {
            Ok(h) => h,
            Err(err) => {
                tracing::warn!(number, error = %err, "revision failed");
                self.set_error(format!("#{}: revision failed: {}", number, err));
                return;
            }
        };
        let Some(current) = self.session.get(number) else {
            self.set_error(format!("#{}: revision arrived for a missing hypothesis", number));
            return;
        };

        let next = apply_revision(current, revised, pending, &now_timestamp()).and_then(|h| {
            validate(&h)?;
            Ok(h)
        });
        match next {
            Ok(h) => {
                let version = h.version.clone();
                self.session.upsert(h);
                self.touch();
                tracing::info!(number, version = %version, "revision applied");
                if self.selected_number() == Some(number) {
                    self.surface.mark_dirty(Region::Detail);
                    self.surface.mark_dirty(Region::Header);
                    self.clamp_focus();
                }
                self.set_status(format!("#{} revised to v{}", number, version));
            }
            Err(err) => self.set_error(err),
        }
    }
}
