use pretty_assertions::assert_eq;

use super::*;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ch(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

#[test]
fn arrows_and_letters_alias_the_same_command() {
    let mut d = Dispatcher::default();
    assert_eq!(d.dispatch(key(KeyCode::Up)), Some(Command::MoveUp));
    assert_eq!(d.dispatch(ch('k')), Some(Command::MoveUp));
    assert_eq!(d.dispatch(key(KeyCode::PageDown)), Some(Command::PageDown));
    assert_eq!(d.dispatch(ch('d')), Some(Command::PageDown));
    assert_eq!(d.dispatch(ch('<')), Some(Command::FocusLeft));
    assert_eq!(d.dispatch(key(KeyCode::Home)), Some(Command::Home));
}

#[test]
fn letters_are_case_insensitive() {
    let mut d = Dispatcher::default();
    let shifted = KeyEvent::new(KeyCode::Char('F'), KeyModifiers::SHIFT);
    assert_eq!(d.dispatch(shifted), Some(Command::SubmitFeedback));
    assert_eq!(d.dispatch(ch('Q')), Some(Command::Quit));
}

#[test]
fn unknown_keys_and_normal_mode_escape_are_ignored() {
    let mut d = Dispatcher::default();
    assert_eq!(d.dispatch(ch('z')), None);
    assert_eq!(d.dispatch(key(KeyCode::Esc)), None);
    assert_eq!(
        d.dispatch(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::ALT)),
        None
    );
    assert_eq!(d.mode(), &Mode::Normal);
}

#[test]
fn ctrl_c_quits_from_any_mode() {
    let mut d = Dispatcher::default();
    d.prompt(PromptKind::LoadPath, "");
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(d.dispatch(ctrl_c), Some(Command::Quit));
    assert_eq!(d.mode(), &Mode::Normal);
}

#[test]
fn prompt_accumulates_and_submits() {
    let mut d = Dispatcher::default();
    d.prompt(PromptKind::Feedback(3), "");
    for c in "add morx".chars() {
        assert_eq!(d.dispatch(ch(c)), Some(Command::PromptEdited));
    }
    d.dispatch(key(KeyCode::Backspace));
    d.dispatch(ch('e'));
    d.dispatch(key(KeyCode::Left));
    d.dispatch(key(KeyCode::Right));
    // Letters that are commands in normal mode are text here.
    assert_eq!(
        d.dispatch(key(KeyCode::Enter)),
        Some(Command::Submit(PromptKind::Feedback(3), "add more".to_string()))
    );
    assert_eq!(d.mode(), &Mode::Normal);
}

#[test]
fn cancel_discards_partial_input() {
    let mut d = Dispatcher::default();
    d.prompt(PromptKind::Notes(1), "old notes");
    d.dispatch(ch('!'));
    assert_eq!(d.dispatch(key(KeyCode::Esc)), Some(Command::Cancel));
    assert_eq!(d.mode(), &Mode::Normal);

    d.prompt(PromptKind::Notes(1), "old notes");
    match d.mode() {
        Mode::Prompted { input, .. } => assert_eq!(input.buf, "old notes"),
        other => panic!("unexpected mode {:?}", other),
    }
}

#[test]
fn number_prompt_accepts_digits_only() {
    let mut d = Dispatcher::default();
    d.prompt(PromptKind::JumpNumber, "");
    assert_eq!(d.dispatch(ch('x')), None);
    assert_eq!(d.dispatch(ch('1')), Some(Command::PromptEdited));
    assert_eq!(d.dispatch(ch('2')), Some(Command::PromptEdited));
    assert_eq!(
        d.dispatch(key(KeyCode::Enter)),
        Some(Command::Submit(PromptKind::JumpNumber, "12".to_string()))
    );
}

#[test]
fn any_key_dismisses_modal() {
    let mut d = Dispatcher::default();
    d.show_modal(ModalKind::Help);
    assert_eq!(d.dispatch(ch('j')), Some(Command::Cancel));
    assert_eq!(d.mode(), &Mode::Normal);

    d.show_modal(ModalKind::Titles);
    assert_eq!(d.dispatch(key(KeyCode::Esc)), Some(Command::Cancel));
    assert_eq!(d.mode(), &Mode::Normal);
}

#[test]
fn key_table_has_no_conflicting_bindings() {
    let mut seen: Vec<KeyCode> = Vec::new();
    for def in KEY_TABLE {
        for k in def.keys {
            assert!(
                !seen.iter().any(|s| key_matches(s, k)),
                "{:?} bound twice ({})",
                k,
                def.name
            );
            seen.push(*k);
        }
    }
}
