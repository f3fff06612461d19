use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::session::PendingAction;
use crate::tui::app::{App, EditCursor};
use crate::util::unicode;

use super::common::{multiline_pos_to_offset, offset_to_multiline_pos};
use super::navigate::new_note;

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        // Leaving the editor saves
        KeyCode::Esc => finish(app),
        KeyCode::Char('s') if ctrl => finish(app),
        // Sibling actions abandon the edit
        KeyCode::Char('n') if ctrl => new_note(app),
        KeyCode::Char('d') if ctrl => {
            app.state.press(PendingAction::DeleteNote);
            let requests = app.state.blur();
            app.send(requests);
        }
        KeyCode::Char('x') if ctrl => app.state.cancel_edit(),

        KeyCode::Char('a') if ctrl => app.edit_cursor.col = 0,
        KeyCode::Home => app.edit_cursor.col = 0,
        KeyCode::Char('e') if ctrl => end_of_line(app),
        KeyCode::End => end_of_line(app),
        KeyCode::Char('u') if ctrl => kill_to_line_start(app),
        KeyCode::Left if alt || ctrl => word_left(app),
        KeyCode::Right if alt || ctrl => word_right(app),
        KeyCode::Left => left(app),
        KeyCode::Right => right(app),
        KeyCode::Up => vertical(app, -1),
        KeyCode::Down => vertical(app, 1),

        KeyCode::Enter => insert(app, "\n"),
        KeyCode::Tab => insert(app, "    "),
        KeyCode::Backspace => backspace(app),
        KeyCode::Delete => delete_forward(app),
        KeyCode::Char(c) if !ctrl && !alt => {
            let mut buf = [0u8; 4];
            insert(app, c.encode_utf8(&mut buf));
        }
        _ => {}
    }
}

fn finish(app: &mut App) {
    let requests = app.state.blur();
    app.send(requests);
}

/// Current line text and the cursor's byte offset in the whole buffer.
fn locate(app: &App) -> Option<(String, usize)> {
    let buffer = app.state.session.buffer()?;
    let cursor = app.edit_cursor;
    let line = buffer.split('\n').nth(cursor.line).unwrap_or("").to_string();
    Some((line, multiline_pos_to_offset(buffer, cursor.line, cursor.col)))
}

fn set_offset(app: &mut App, offset: usize) {
    if let Some(buffer) = app.state.session.buffer() {
        let (line, col) = offset_to_multiline_pos(buffer, offset);
        app.edit_cursor = EditCursor { line, col };
    }
}

fn insert(app: &mut App, text: &str) {
    let Some((_, offset)) = locate(app) else {
        return;
    };
    if let Some(buffer) = app.state.session.buffer_mut() {
        buffer.insert_str(offset, text);
    }
    set_offset(app, offset + text.len());
}

fn backspace(app: &mut App) {
    let Some((line, offset)) = locate(app) else {
        return;
    };
    let col = app.edit_cursor.col.min(line.len());
    // at column 0 this joins with the previous line
    let start = match unicode::prev_grapheme_boundary(&line, col) {
        Some(prev) => offset - (col - prev),
        None if offset > 0 => offset - 1,
        None => return,
    };
    if let Some(buffer) = app.state.session.buffer_mut() {
        buffer.drain(start..offset);
    }
    set_offset(app, start);
}

fn delete_forward(app: &mut App) {
    let Some((line, offset)) = locate(app) else {
        return;
    };
    let col = app.edit_cursor.col.min(line.len());
    let end = match unicode::next_grapheme_boundary(&line, col) {
        Some(next) => offset + (next - col),
        None => offset + 1,
    };
    if let Some(buffer) = app.state.session.buffer_mut()
        && end <= buffer.len()
    {
        buffer.drain(offset..end);
    }
}

fn left(app: &mut App) {
    let Some((line, _)) = locate(app) else {
        return;
    };
    let col = app.edit_cursor.col.min(line.len());
    match unicode::prev_grapheme_boundary(&line, col) {
        Some(prev) => app.edit_cursor.col = prev,
        None if app.edit_cursor.line > 0 => {
            app.edit_cursor.line -= 1;
            end_of_line(app);
        }
        None => {}
    }
}

fn right(app: &mut App) {
    let Some((line, offset)) = locate(app) else {
        return;
    };
    let col = app.edit_cursor.col.min(line.len());
    match unicode::next_grapheme_boundary(&line, col) {
        Some(next) => app.edit_cursor.col = next,
        // end of line: step onto the next one, if any
        None => set_offset(app, offset + 1),
    }
}

fn word_left(app: &mut App) {
    if let Some((line, _)) = locate(app) {
        app.edit_cursor.col = unicode::word_boundary_left(&line, app.edit_cursor.col.min(line.len()));
    }
}

fn word_right(app: &mut App) {
    if let Some((line, _)) = locate(app) {
        app.edit_cursor.col = unicode::word_boundary_right(&line, app.edit_cursor.col.min(line.len()));
    }
}

fn end_of_line(app: &mut App) {
    if let Some((line, _)) = locate(app) {
        app.edit_cursor.col = line.len();
    }
}

/// Move up or down a line, keeping the display column where possible.
fn vertical(app: &mut App, delta: isize) {
    let Some(buffer) = app.state.session.buffer() else {
        return;
    };
    let lines: Vec<&str> = buffer.split('\n').collect();
    let cursor = app.edit_cursor;
    let Some(target) = cursor.line.checked_add_signed(delta) else {
        return;
    };
    let (Some(current), Some(next)) = (lines.get(cursor.line), lines.get(target)) else {
        return;
    };
    let display_col = unicode::byte_offset_to_display_col(current, cursor.col);
    app.edit_cursor = EditCursor {
        line: target,
        col: unicode::display_col_to_byte_offset(next, display_col),
    };
}

fn kill_to_line_start(app: &mut App) {
    let Some((line, offset)) = locate(app) else {
        return;
    };
    let col = app.edit_cursor.col.min(line.len());
    if let Some(buffer) = app.state.session.buffer_mut() {
        buffer.drain(offset - col..offset);
    }
    app.edit_cursor.col = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::request::Request;
    use crate::tui::render::test_helpers::demo_app;

    fn editing(text: &str) -> App {
        let (mut app, _api) = demo_app();
        new_note(&mut app);
        if let Some(buffer) = app.state.session.buffer_mut() {
            *buffer = text.to_string();
        }
        app
    }

    fn key(app: &mut App, code: KeyCode) {
        handle_edit(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn buffer(app: &App) -> &str {
        app.state.session.buffer().unwrap()
    }

    #[test]
    fn backspace_at_line_start_joins_lines() {
        let mut app = editing("Title\nbody");
        app.edit_cursor = EditCursor { line: 1, col: 0 };
        key(&mut app, KeyCode::Backspace);
        assert_eq!(buffer(&app), "Titlebody");
        assert_eq!(app.edit_cursor, EditCursor { line: 0, col: 5 });
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut app = editing("cafe\u{301}");
        app.edit_cursor = EditCursor { line: 0, col: "cafe\u{301}".len() };
        key(&mut app, KeyCode::Backspace);
        assert_eq!(buffer(&app), "caf");
    }

    #[test]
    fn enter_splits_the_line() {
        let mut app = editing("Titlebody");
        app.edit_cursor = EditCursor { line: 0, col: 5 };
        key(&mut app, KeyCode::Enter);
        assert_eq!(buffer(&app), "Title\nbody");
        assert_eq!(app.edit_cursor, EditCursor { line: 1, col: 0 });
    }

    #[test]
    fn arrows_cross_line_ends() {
        let mut app = editing("ab\ncd");
        app.edit_cursor = EditCursor { line: 0, col: 2 };
        key(&mut app, KeyCode::Right);
        assert_eq!(app.edit_cursor, EditCursor { line: 1, col: 0 });
        key(&mut app, KeyCode::Left);
        assert_eq!(app.edit_cursor, EditCursor { line: 0, col: 2 });
        key(&mut app, KeyCode::Down);
        assert_eq!(app.edit_cursor, EditCursor { line: 1, col: 2 });
        key(&mut app, KeyCode::Down);
        assert_eq!(app.edit_cursor, EditCursor { line: 1, col: 2 });
    }

    #[test]
    fn delete_forward_joins_next_line() {
        let mut app = editing("ab\ncd");
        app.edit_cursor = EditCursor { line: 0, col: 2 };
        key(&mut app, KeyCode::Delete);
        assert_eq!(buffer(&app), "abcd");
        key(&mut app, KeyCode::End);
        key(&mut app, KeyCode::Delete);
        assert_eq!(buffer(&app), "abcd");
    }

    #[test]
    fn ctrl_d_discards_new_note_without_requests() {
        let mut app = editing("draft\n");
        handle_edit(&mut app, KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert!(!app.is_editing());
        assert!(app.outbox().is_empty());
        assert_eq!(app.state.latest_notice().unwrap().message, "new note discarded");
    }

    #[test]
    fn esc_on_blank_note_stays_in_editor() {
        let mut app = editing("\n");
        key(&mut app, KeyCode::Esc);
        assert!(app.is_editing());
        assert!(!app.outbox().iter().any(Request::is_mutation));
    }
}
