mod common;
mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::App;

use common::*;
use edit::*;
use navigate::*;

/// Handle a key event: the editor takes every key while a note is being
/// edited, otherwise the focused pane does.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    let key = normalize_key(key);
    if app.is_editing() {
        handle_edit(app, key);
    } else {
        handle_navigate(app, key);
    }
}

/// Handle a bracketed paste event. Only active while editing; inserted as-is.
pub fn handle_paste(app: &mut App, text: &str) {
    if !app.is_editing() || text.is_empty() {
        return;
    }
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let cursor = app.edit_cursor;
    if let Some(buffer) = app.state.session.buffer_mut() {
        let offset = multiline_pos_to_offset(buffer, cursor.line, cursor.col);
        buffer.insert_str(offset, &text);
        let (line, col) = offset_to_multiline_pos(buffer, offset + text.len());
        app.edit_cursor.line = line;
        app.edit_cursor.col = col;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::api::NotesApi;
    use crate::model::NoteId;
    use crate::ops::request::Request;
    use crate::tui::app::{EditCursor, Pane};
    use crate::tui::render::test_helpers::{demo_app, settle};
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                press(app, KeyCode::Enter);
            } else {
                press(app, KeyCode::Char(c));
            }
        }
    }

    #[test]
    fn enter_on_tag_filters_titles() {
        let (mut app, mut api) = demo_app();
        // demo tags sorted: errands, home, ideas, work
        app.tag_cursor = 3;
        press(&mut app, KeyCode::Enter);
        settle(&mut app, &mut api);
        assert_eq!(app.state.selection.current(), vec!["work"]);
        assert_eq!(app.state.titles.len(), 2);
    }

    #[test]
    fn open_edit_and_save_through_keys() {
        let (mut app, mut api) = demo_app();
        app.focus = Pane::Titles;
        app.title_cursor = 2; // Standup Notes
        press(&mut app, KeyCode::Enter);
        settle(&mut app, &mut api);
        assert!(app.state.session.viewing().unwrap().shown.is_some());

        press(&mut app, KeyCode::Char('e'));
        assert!(app.is_editing());
        assert_eq!(app.focus, Pane::Note);
        assert_eq!(app.edit_cursor, EditCursor { line: 0, col: 13 });

        type_text(&mut app, " (Mon)");
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.outbox(), [Request::SaveNote(_)]));
        settle(&mut app, &mut api);

        assert!(!app.is_editing());
        assert!(app.state.titles.entries().iter().any(|t| t.title == "Standup Notes (Mon)"));
    }

    #[test]
    fn ctrl_n_while_editing_discards_and_starts_new() {
        let (mut app, mut api) = demo_app();
        app.focus = Pane::Titles;
        press(&mut app, KeyCode::Enter);
        settle(&mut app, &mut api);
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "zzz");

        ctrl(&mut app, 'n');
        assert!(app.outbox().is_empty());
        assert!(app.is_editing());
        assert_eq!(app.state.session.buffer(), Some("\n"));
        assert_eq!(app.edit_cursor, EditCursor { line: 0, col: 0 });

        type_text(&mut app, "Fresh");
        press(&mut app, KeyCode::Esc);
        settle(&mut app, &mut api);
        assert_eq!(api.len(), 5);
        let untouched = api.get_note(&NoteId::from("1")).unwrap();
        assert_eq!(untouched.title, "Grocery List");
    }

    #[test]
    fn delete_key_removes_open_note() {
        let (mut app, mut api) = demo_app();
        app.focus = Pane::Titles;
        press(&mut app, KeyCode::Enter);
        settle(&mut app, &mut api);
        press(&mut app, KeyCode::Char('d'));
        settle(&mut app, &mut api);
        assert_eq!(api.len(), 3);
        assert_eq!(app.state.session.open_id(), None);
    }

    #[test]
    fn paste_inserts_at_cursor() {
        let (mut app, _api) = demo_app();
        press(&mut app, KeyCode::Char('n'));
        handle_paste(&mut app, "Title\r\nbody");
        assert_eq!(app.state.session.buffer(), Some("Title\nbody\n"));
        assert_eq!(app.edit_cursor, EditCursor { line: 1, col: 4 });
    }

    #[test]
    fn q_quits_only_outside_the_editor() {
        let (mut app, _api) = demo_app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.state.session.buffer(), Some("q\n"));
        ctrl(&mut app, 'x');
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
