use super::*;

impl App {
    pub(in crate::tui_shell) fn handle_key(&mut self, key: KeyEvent) {
        let Some(cmd) = self.keys.dispatch(key) else {
            return;
        };
        self.execute(cmd);
    }

    pub(in crate::tui_shell) fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::FocusLeft => self.navigate(Nav::FocusLeft),
            Command::FocusRight => self.navigate(Nav::FocusRight),
            Command::MoveUp => self.navigate(Nav::Up),
            Command::MoveDown => self.navigate(Nav::Down),
            Command::PageUp => self.navigate(Nav::PageUp),
            Command::PageDown => self.navigate(Nav::PageDown),
            Command::Select => {
                if self.focus.pane == Pane::List && self.selected().is_some() {
                    self.navigate(Nav::FocusRight);
                }
            }

            Command::SubmitFeedback => {
                let Some(number) = self.selected_number() else {
                    self.set_error("no hypothesis selected");
                    return;
                };
                if self.jobs.is_revising(number) {
                    self.set_error(SessionError::Busy(number));
                    return;
                }
                self.open_prompt(PromptKind::Feedback(number), "");
            }
            Command::NewHypothesis => match self.request_new(HypothesisKind::NewAlternative) {
                Ok(()) => self.set_status("generating a new hypothesis..."),
                Err(err) => self.set_error(err),
            },
            Command::Export => self.export_selected(),
            Command::FetchReferences => match self.selected_number() {
                Some(number) => match self.request_fetch(number) {
                    Ok(()) => self.set_status(format!("fetching references for #{}...", number)),
                    Err(err) => self.set_error(err),
                },
                None => self.set_error("no hypothesis selected"),
            },
            Command::LoadSession => self.open_prompt(PromptKind::LoadPath, ""),
            Command::SaveSessionAs => {
                let current = self.save_path.display().to_string();
                self.open_prompt(PromptKind::SavePath, &current);
            }
            Command::EditNotes => match self.selected() {
                Some(h) => {
                    let (number, notes) = (h.hypothesis_number, h.notes.clone());
                    self.open_prompt(PromptKind::Notes(number), &notes);
                }
                None => self.set_error("no hypothesis selected"),
            },
            Command::JumpToNumber => {
                if self.session.hypotheses.is_empty() {
                    self.set_error("no hypotheses yet");
                    return;
                }
                self.open_prompt(PromptKind::JumpNumber, "");
            }

            Command::ListTitles => self.open_modal(ModalKind::Titles),
            Command::Help => self.open_modal(ModalKind::Help),
            Command::ToggleAnalysis => {
                self.show_analysis = !self.show_analysis;
                self.clamp_focus();
                self.surface.mark_dirty(Region::Detail);
            }
            Command::ToggleReferences => {
                self.show_references = !self.show_references;
                self.clamp_focus();
                self.surface.mark_dirty(Region::Detail);
            }
            Command::Home => {
                self.focus.reset(&mut self.surface);
                self.show_analysis = true;
                self.show_references = true;
            }

            Command::Quit => self.quit = true,
            Command::Cancel => {
                self.surface.set_overlay(false);
                self.surface.mark_dirty(Region::Status);
            }
            Command::PromptEdited => self.surface.mark_dirty(Region::Status),
            Command::Submit(kind, text) => {
                self.surface.mark_dirty(Region::Status);
                self.submit_prompt(kind, text);
            }
        }
    }

    fn open_prompt(&mut self, kind: PromptKind, initial: &str) {
        self.keys.prompt(kind, initial);
        self.surface.mark_dirty(Region::Status);
    }

    fn open_modal(&mut self, kind: ModalKind) {
        self.keys.show_modal(kind);
        self.surface.set_overlay(true);
        self.surface.mark_dirty(Region::Status);
    }

    fn submit_prompt(&mut self, kind: PromptKind, text: String) {
        match kind {
            PromptKind::Feedback(number) => match self.request_revision(number, &text) {
                Ok(()) => self.set_status(format!("revising #{}...", number)),
                Err(SessionError::EmptyFeedback) => {
                    self.set_error(SessionError::EmptyFeedback);
                    self.open_prompt(kind, "");
                }
                Err(err) => self.set_error(err),
            },
            PromptKind::Notes(number) => {
                let Some(index) = self.session.position(number) else {
                    self.set_error(format!("no hypothesis #{}", number));
                    return;
                };
                self.session.hypotheses[index].notes = text.trim_end().to_string();
                self.touch();
                self.clamp_focus();
                self.surface.mark_dirty(Region::Detail);
                self.set_status(format!("notes saved for #{}", number));
            }
            PromptKind::LoadPath => {
                let path = text.trim();
                if path.is_empty() {
                    return;
                }
                self.load_and_merge(Path::new(path));
            }
            PromptKind::SavePath => {
                let path = text.trim();
                if path.is_empty() {
                    return;
                }
                self.save_as(Path::new(path));
            }
            PromptKind::JumpNumber => {
                let target = text.trim().parse::<u32>().ok();
                match target.and_then(|n| self.session.position(n)) {
                    Some(index) => self.select_index(index),
                    None => {
                        let numbers = self.session.numbers();
                        let range = match (numbers.first(), numbers.last()) {
                            (Some(lo), Some(hi)) => format!("{}-{}", lo, hi),
                            _ => "none".to_string(),
                        };
                        self.set_error(format!(
                            "no hypothesis #{} (available: {})",
                            text.trim(),
                            range
                        ));
                    }
                }
            }
        }
    }

    fn export_selected(&mut self) {
        let Some(h) = self.selected() else {
            self.set_error("no hypothesis selected");
            return;
        };
        let number = h.hypothesis_number;
        let result = self
            .collab
            .exporter
            .render_to_document(h, &self.session.research_goal)
            .map_err(SessionError::collaborator);
        match result {
            Ok(path) => {
                tracing::info!(number, path = %path.display(), "exported");
                self.set_status(format!("exported #{} to {}", number, path.display()));
            }
            Err(err) => self.set_error(err),
        }
    }
}
