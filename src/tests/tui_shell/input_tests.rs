use pretty_assertions::assert_eq;

use super::*;

#[test]
fn edits_at_cursor() {
    let mut input = Input::default();
    for c in "helo".chars() {
        input.insert_char(c);
    }
    input.move_left();
    input.insert_char('l');
    assert_eq!(input.buf, "hello");
    assert_eq!(input.cursor, 4);

    input.move_home();
    input.delete();
    assert_eq!(input.buf, "ello");
    input.backspace();
    assert_eq!(input.buf, "ello");

    input.move_end();
    input.backspace();
    assert_eq!(input.buf, "ell");
}

#[test]
fn handles_multibyte_characters() {
    let mut input = Input::with_text("naïve");
    assert_eq!(input.cursor, 5);
    input.move_left();
    input.move_left();
    input.backspace();
    assert_eq!(input.buf, "nave");
    input.insert_char('ï');
    input.move_right();
    input.move_right();
    input.move_right();
    assert_eq!(input.cursor, 5);
    assert_eq!(input.take(), "naïve");
    assert_eq!(input, Input::default());
}
