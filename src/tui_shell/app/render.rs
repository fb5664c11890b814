use super::*;

fn pane_title(text: String, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    Line::from(Span::styled(text, style))
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn push_wrapped(out: &mut Vec<Line<'static>>, text: &str, width: usize, indent: &str) {
    let inner = width.saturating_sub(indent.chars().count()).max(1);
    for row in wrap(text, inner) {
        out.push(Line::from(format!("{}{}", indent, row)));
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("").trim()
}

impl App {
    /// Paints every dirty region, then flushes once.
    pub(in crate::tui_shell) fn redraw<S: GridSink>(&mut self, sink: &mut S) -> io::Result<bool> {
        for region in self.surface.dirty_regions() {
            let lines = self.region_lines(region);
            self.surface.draw(region, lines);
        }
        let cursor = self.prompt_cursor();
        self.surface.set_cursor(cursor);
        self.surface.flush(sink)
    }

    fn region_lines(&self, region: Region) -> Vec<Line<'static>> {
        match region {
            Region::Header => self.header_lines(),
            Region::List => self.list_lines(),
            Region::Detail => match self.keys.mode() {
                Mode::Modal(kind) => self.modal_lines(*kind),
                _ => self.detail_pane_lines(),
            },
            Region::Status => self.status_lines(),
        }
    }

    fn header_lines(&self) -> Vec<Line<'static>> {
        let goal = first_line(&self.session.research_goal);
        let title = Line::from(vec![
            Span::styled(
                " conjecture ",
                Style::default().fg(Color::Black).bg(Color::White),
            ),
            Span::raw("  "),
            Span::raw(if goal.is_empty() {
                "(no research goal)".to_string()
            } else {
                goal.to_string()
            }),
        ]);

        let model = if self.session.model_identifier.is_empty() {
            "no model"
        } else {
            self.session.model_identifier.as_str()
        };
        let focus = match self.focus.pane {
            Pane::List => "list",
            Pane::Detail => "detail",
        };
        let info = Line::from(Span::styled(
            format!(
                "model: {}  hypotheses: {}  feedback: {}  focus: {}  file: {}",
                model,
                self.session.hypotheses.len(),
                self.session.total_feedback_entries(),
                focus,
                self.save_path.display()
            ),
            Style::default().fg(Color::Gray),
        ));
        vec![title, info]
    }

    fn list_lines(&self) -> Vec<Line<'static>> {
        let area = self.surface.area(Region::List);
        let focused = self.focus.pane == Pane::List;
        let mut out = vec![pane_title(
            format!("Hypotheses ({})", self.session.hypotheses.len()),
            focused,
        )];

        if self.session.hypotheses.is_empty() {
            let hint = if self.jobs.in_flight() > 0 {
                "(generating...)"
            } else {
                "(none yet, press n)"
            };
            out.push(Line::from(Span::styled(
                hint,
                Style::default().add_modifier(Modifier::DIM),
            )));
            return out;
        }

        let page = area.height.saturating_sub(1) as usize;
        let start = self.focus.list_scroll_offset;
        for (i, h) in self
            .session
            .hypotheses
            .iter()
            .enumerate()
            .skip(start)
            .take(page)
        {
            let busy = if self.jobs.is_revising(h.hypothesis_number) {
                " *"
            } else {
                ""
            };
            let text = format!(
                "#{} v{} {}{}",
                h.hypothesis_number,
                h.version,
                first_line(&h.title),
                busy
            );
            let style = match (i == self.focus.selected_index, focused) {
                (true, true) => Style::default().add_modifier(Modifier::REVERSED),
                (true, false) => Style::default().add_modifier(Modifier::BOLD),
                _ => Style::default(),
            };
            out.push(Line::from(Span::styled(text, style)));
        }
        out
    }

    fn detail_pane_lines(&self) -> Vec<Line<'static>> {
        let area = self.surface.area(Region::Detail);
        let title = match self.selected() {
            Some(h) => format!(
                "#{} v{} ({})",
                h.hypothesis_number,
                h.version,
                h.kind.label()
            ),
            None => "Detail".to_string(),
        };
        let mut out = vec![pane_title(title, self.focus.pane == Pane::Detail)];
        out.extend(
            self.detail_lines(area.width as usize)
                .into_iter()
                .skip(self.focus.detail_scroll_offset),
        );
        out
    }

    /// Scrollable content of the detail pane, already wrapped to `width`.
    pub(in crate::tui_shell) fn detail_lines(&self, width: usize) -> Vec<Line<'static>> {
        let Some(h) = self.selected() else {
            return vec![Line::from("Nothing selected.")];
        };
        let width = width.saturating_sub(1).max(1);
        let mut out = Vec::new();

        for row in wrap(&h.title, width) {
            out.push(Line::from(Span::styled(
                row,
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
        out.push(Line::from(Span::styled(
            format!(
                "created {}  {} feedback entr{}",
                h.created_at,
                h.feedback_history.len(),
                if h.feedback_history.len() == 1 { "y" } else { "ies" }
            ),
            Style::default().fg(Color::Gray),
        )));
        out.push(Line::default());

        out.push(heading("Hypothesis"));
        push_wrapped(&mut out, &h.body, width, "");
        out.push(Line::default());

        if !h.validation_plan.trim().is_empty() {
            out.push(heading("Experimental validation"));
            push_wrapped(&mut out, &h.validation_plan, width, "");
            out.push(Line::default());
        }

        if self.show_analysis {
            out.push(heading("Analysis"));
            for key in Analysis::KEYS {
                out.push(Line::from(Span::styled(
                    Analysis::heading(key).to_string(),
                    Style::default().add_modifier(Modifier::UNDERLINED),
                )));
                push_wrapped(&mut out, h.analysis.get(key).unwrap_or(""), width, "  ");
            }
            out.push(Line::default());
        } else {
            out.push(Line::from(Span::styled(
                "[analysis hidden, h to show]",
                Style::default().add_modifier(Modifier::DIM),
            )));
        }

        if !h.references.is_empty() {
            if self.show_references {
                out.push(heading("References"));
                for (i, r) in h.references.iter().enumerate() {
                    push_wrapped(&mut out, &format!("{}. {}", i + 1, r.citation), width, "");
                    if !r.annotation.is_empty() {
                        push_wrapped(&mut out, &r.annotation, width, "   ");
                    }
                }
                out.push(Line::default());
            } else {
                out.push(Line::from(Span::styled(
                    format!("[{} references hidden, r to show]", h.references.len()),
                    Style::default().add_modifier(Modifier::DIM),
                )));
            }
        }

        if !h.notes.is_empty() {
            out.push(heading("Notes"));
            push_wrapped(&mut out, &h.notes, width, "");
            out.push(Line::default());
        }

        if !h.feedback_history.is_empty() {
            out.push(heading("Feedback history"));
            for e in &h.feedback_history {
                out.push(Line::from(Span::styled(
                    format!("v{} -> v{}  {}", e.version_before, e.version_after, e.timestamp),
                    Style::default().fg(Color::Gray),
                )));
                push_wrapped(&mut out, &e.feedback_text, width, "  ");
            }
        }
        out
    }

    fn modal_lines(&self, kind: ModalKind) -> Vec<Line<'static>> {
        let mut out = Vec::new();
        match kind {
            ModalKind::Titles => {
                out.push(pane_title("All hypotheses".to_string(), true));
                let selected = self.selected_number();
                for h in &self.session.hypotheses {
                    let style = if Some(h.hypothesis_number) == selected {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    out.push(Line::from(Span::styled(
                        format!(
                            "#{:<4} v{:<6} {:<11} {}",
                            h.hypothesis_number,
                            h.version,
                            h.kind.label(),
                            first_line(&h.title)
                        ),
                        style,
                    )));
                }
                if self.session.hypotheses.is_empty() {
                    out.push(Line::from("(no hypotheses yet)"));
                }
            }
            ModalKind::Help => {
                out.push(pane_title("Keys".to_string(), true));
                for def in KEY_TABLE {
                    out.push(Line::from(vec![
                        Span::styled(
                            format!("{:<10}", def.label),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::raw(format!("{:<26}", def.name)),
                        Span::raw(def.help),
                    ]));
                }
            }
        }
        out
    }

    fn status_lines(&self) -> Vec<Line<'static>> {
        let first = match self.keys.mode() {
            Mode::Prompted { kind, input } => Line::from(vec![
                Span::styled(
                    format!("{}: ", kind.label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(input.buf.clone()),
            ]),
            _ => match self.status.message() {
                Some(m) => Line::from(Span::styled(
                    m.text.clone(),
                    Style::default().fg(if m.error { Color::Red } else { Color::Green }),
                )),
                None => Line::default(),
            },
        };

        let mut hint = Vec::new();
        let running = self.jobs.in_flight();
        if running > 0 {
            hint.push(Span::styled(
                format!("[{} {} running] ", self.status.spinner(), running),
                Style::default().fg(Color::Yellow),
            ));
        }
        let keys = match self.keys.mode() {
            Mode::Normal => "f feedback  n new  t notes  p export  a fetch  l load  x save as  ? help  q quit",
            Mode::Prompted { .. } => "Enter confirm  Esc cancel",
            Mode::Modal(_) => "press any key to close",
        };
        hint.push(Span::styled(
            keys,
            Style::default().add_modifier(Modifier::DIM),
        ));
        vec![first, Line::from(hint)]
    }

    fn prompt_cursor(&self) -> Option<Position> {
        let Mode::Prompted { kind, input } = self.keys.mode() else {
            return None;
        };
        let area = self.surface.area(Region::Status);
        if area.is_empty() {
            return None;
        }
        let col = kind.label().chars().count() + 2 + input.cursor;
        let x = area.x as usize + col.min(area.width.saturating_sub(1) as usize);
        Some(Position::new(x as u16, area.y))
    }
}
