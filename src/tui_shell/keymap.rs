//! Key table and the three input modes (normal, prompted, modal).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::input::Input;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum Command {
    FocusLeft,
    FocusRight,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Select,
    SubmitFeedback,
    NewHypothesis,
    Export,
    FetchReferences,
    LoadSession,
    SaveSessionAs,
    EditNotes,
    JumpToNumber,
    ListTitles,
    ToggleAnalysis,
    ToggleReferences,
    Home,
    Help,
    Quit,
    Cancel,

    /// A prompt's text changed; only the prompt line needs repainting.
    PromptEdited,
    /// A prompt was confirmed with this text.
    Submit(PromptKind, String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum PromptKind {
    Feedback(u32),
    Notes(u32),
    LoadPath,
    SavePath,
    JumpNumber,
}

impl PromptKind {
    pub(in crate::tui_shell) fn label(self) -> String {
        match self {
            PromptKind::Feedback(n) => format!("Feedback for #{}", n),
            PromptKind::Notes(n) => format!("Notes for #{}", n),
            PromptKind::LoadPath => "Load session".to_string(),
            PromptKind::SavePath => "Save session as".to_string(),
            PromptKind::JumpNumber => "Go to hypothesis #".to_string(),
        }
    }

    fn accepts(self, c: char) -> bool {
        match self {
            PromptKind::JumpNumber => c.is_ascii_digit(),
            _ => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum ModalKind {
    Titles,
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum Mode {
    Normal,
    Prompted { kind: PromptKind, input: Input },
    Modal(ModalKind),
}

pub(in crate::tui_shell) struct KeyDef {
    pub(in crate::tui_shell) command: Command,
    pub(in crate::tui_shell) name: &'static str,
    pub(in crate::tui_shell) keys: &'static [KeyCode],
    pub(in crate::tui_shell) label: &'static str,
    pub(in crate::tui_shell) help: &'static str,
}

pub(in crate::tui_shell) static KEY_TABLE: &[KeyDef] = &[
    KeyDef {
        command: Command::FocusLeft,
        name: "focus-left",
        keys: &[KeyCode::Left, KeyCode::Char('<')],
        label: "←/<",
        help: "Focus the hypothesis list",
    },
    KeyDef {
        command: Command::FocusRight,
        name: "focus-right",
        keys: &[KeyCode::Right, KeyCode::Char('>')],
        label: "→/>",
        help: "Focus the detail pane",
    },
    KeyDef {
        command: Command::MoveUp,
        name: "move-up",
        keys: &[KeyCode::Up, KeyCode::Char('k')],
        label: "↑/k",
        help: "Previous hypothesis, or scroll detail up",
    },
    KeyDef {
        command: Command::MoveDown,
        name: "move-down",
        keys: &[KeyCode::Down, KeyCode::Char('j')],
        label: "↓/j",
        help: "Next hypothesis, or scroll detail down",
    },
    KeyDef {
        command: Command::PageUp,
        name: "page-up",
        keys: &[KeyCode::PageUp, KeyCode::Char('u')],
        label: "PgUp/u",
        help: "Page up in the focused pane",
    },
    KeyDef {
        command: Command::PageDown,
        name: "page-down",
        keys: &[KeyCode::PageDown, KeyCode::Char('d')],
        label: "PgDn/d",
        help: "Page down in the focused pane",
    },
    KeyDef {
        command: Command::Select,
        name: "select",
        keys: &[KeyCode::Enter],
        label: "Enter",
        help: "Open the selected hypothesis",
    },
    KeyDef {
        command: Command::SubmitFeedback,
        name: "submit-feedback",
        keys: &[KeyCode::Char('f')],
        label: "f",
        help: "Give feedback and request a revision",
    },
    KeyDef {
        command: Command::NewHypothesis,
        name: "new-hypothesis",
        keys: &[KeyCode::Char('n')],
        label: "n",
        help: "Generate a new alternative hypothesis",
    },
    KeyDef {
        command: Command::Export,
        name: "export",
        keys: &[KeyCode::Char('p')],
        label: "p",
        help: "Export the selected hypothesis as a document",
    },
    KeyDef {
        command: Command::FetchReferences,
        name: "fetch-references",
        keys: &[KeyCode::Char('a')],
        label: "a",
        help: "Fetch abstracts for the selected hypothesis' references",
    },
    KeyDef {
        command: Command::LoadSession,
        name: "load-session",
        keys: &[KeyCode::Char('l')],
        label: "l",
        help: "Load a session file and merge it into this one",
    },
    KeyDef {
        command: Command::SaveSessionAs,
        name: "save-session-as",
        keys: &[KeyCode::Char('x')],
        label: "x",
        help: "Save the session under a new name",
    },
    KeyDef {
        command: Command::EditNotes,
        name: "edit-notes",
        keys: &[KeyCode::Char('t')],
        label: "t",
        help: "Edit notes for the selected hypothesis",
    },
    KeyDef {
        command: Command::JumpToNumber,
        name: "jump-to-number",
        keys: &[KeyCode::Char('s')],
        label: "s",
        help: "Jump to a hypothesis by number",
    },
    KeyDef {
        command: Command::ListTitles,
        name: "list-titles",
        keys: &[KeyCode::Char('v')],
        label: "v",
        help: "Show all hypothesis titles",
    },
    KeyDef {
        command: Command::ToggleAnalysis,
        name: "toggle-analysis-display",
        keys: &[KeyCode::Char('h')],
        label: "h",
        help: "Show or hide the analysis section",
    },
    KeyDef {
        command: Command::ToggleReferences,
        name: "toggle-references-display",
        keys: &[KeyCode::Char('r')],
        label: "r",
        help: "Show or hide the references section",
    },
    KeyDef {
        command: Command::Home,
        name: "home",
        keys: &[KeyCode::Home, KeyCode::Char('g')],
        label: "Home/g",
        help: "Reset the view",
    },
    KeyDef {
        command: Command::Help,
        name: "help",
        keys: &[KeyCode::Char('?')],
        label: "?",
        help: "Show this help",
    },
    KeyDef {
        command: Command::Quit,
        name: "quit",
        keys: &[KeyCode::Char('q')],
        label: "q/Ctrl-C",
        help: "Save and quit",
    },
    KeyDef {
        command: Command::Cancel,
        name: "cancel",
        keys: &[KeyCode::Esc],
        label: "Esc",
        help: "Cancel a prompt or close an overlay",
    },
];

fn key_matches(bound: &KeyCode, pressed: &KeyCode) -> bool {
    match (bound, pressed) {
        (KeyCode::Char(b), KeyCode::Char(p)) => b.eq_ignore_ascii_case(p),
        (b, p) => b == p,
    }
}

pub(in crate::tui_shell) fn lookup(code: &KeyCode) -> Option<&'static KeyDef> {
    KEY_TABLE
        .iter()
        .find(|def| def.keys.iter().any(|k| key_matches(k, code)))
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

pub(in crate::tui_shell) struct Dispatcher {
    mode: Mode,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self { mode: Mode::Normal }
    }
}

impl Dispatcher {
    pub(in crate::tui_shell) fn mode(&self) -> &Mode {
        &self.mode
    }

    pub(in crate::tui_shell) fn prompt(&mut self, kind: PromptKind, initial: &str) {
        self.mode = Mode::Prompted {
            kind,
            input: Input::with_text(initial),
        };
    }

    pub(in crate::tui_shell) fn show_modal(&mut self, kind: ModalKind) {
        self.mode = Mode::Modal(kind);
    }

    pub(in crate::tui_shell) fn reset(&mut self) {
        self.mode = Mode::Normal;
    }

    /// Maps one key press to a command for the current mode. `None` means the key means
    /// nothing here and should be ignored.
    pub(in crate::tui_shell) fn dispatch(&mut self, key: KeyEvent) -> Option<Command> {
        if is_ctrl_c(&key) {
            self.mode = Mode::Normal;
            return Some(Command::Quit);
        }

        match &mut self.mode {
            Mode::Normal => {
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    return None;
                }
                let def = lookup(&key.code)?;
                if def.command == Command::Cancel {
                    return None;
                }
                Some(def.command.clone())
            }

            Mode::Modal(_) => {
                self.mode = Mode::Normal;
                Some(Command::Cancel)
            }

            Mode::Prompted { kind, input } => match key.code {
                KeyCode::Esc => {
                    self.mode = Mode::Normal;
                    Some(Command::Cancel)
                }
                KeyCode::Enter => {
                    let kind = *kind;
                    let text = input.take();
                    self.mode = Mode::Normal;
                    Some(Command::Submit(kind, text))
                }
                KeyCode::Backspace => {
                    input.backspace();
                    Some(Command::PromptEdited)
                }
                KeyCode::Delete => {
                    input.delete();
                    Some(Command::PromptEdited)
                }
                KeyCode::Left => {
                    input.move_left();
                    Some(Command::PromptEdited)
                }
                KeyCode::Right => {
                    input.move_right();
                    Some(Command::PromptEdited)
                }
                KeyCode::Home => {
                    input.move_home();
                    Some(Command::PromptEdited)
                }
                KeyCode::End => {
                    input.move_end();
                    Some(Command::PromptEdited)
                }
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL) && kind.accepts(c) =>
                {
                    input.insert_char(c);
                    Some(Command::PromptEdited)
                }
                _ => None,
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/keymap_tests.rs"]
mod tests;
