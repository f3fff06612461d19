use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::format::display_lines;
use crate::tui::app::{App, Pane};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => app.should_quit = true,
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        (_, KeyCode::Char('?')) => app.show_help = true,

        (_, KeyCode::Tab | KeyCode::Right | KeyCode::Char('l')) => app.focus = app.focus.next(),
        (_, KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h')) => {
            app.focus = app.focus.prev()
        }
        (_, KeyCode::Down | KeyCode::Char('j')) => move_cursor(app, 1),
        (_, KeyCode::Up | KeyCode::Char('k')) => move_cursor(app, -1),
        (_, KeyCode::Home | KeyCode::Char('g')) => jump(app, false),
        (_, KeyCode::End | KeyCode::Char('G')) => jump(app, true),

        (_, KeyCode::Enter | KeyCode::Char(' ')) => activate(app),
        (_, KeyCode::Char('e')) => begin_edit(app),
        (_, KeyCode::Char('n')) => new_note(app),
        (_, KeyCode::Char('d')) => {
            let requests = app.state.delete_note();
            app.send(requests);
        }
        (_, KeyCode::Char('a')) => {
            let requests = app.state.clear_selection();
            app.send(requests);
        }
        (_, KeyCode::Char('r')) => {
            let requests = app.state.refresh();
            app.send(requests);
        }
        (_, KeyCode::Char('x') | KeyCode::Esc) => app.state.dismiss_notices(),
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    let step = |cursor: usize, len: usize| -> usize {
        if len == 0 {
            return 0;
        }
        cursor.saturating_add_signed(delta).min(len - 1)
    };
    match app.focus {
        Pane::Tags => {
            app.tag_cursor = step(app.tag_cursor, app.state.selection.tags().len());
        }
        Pane::Titles => {
            app.title_cursor = step(app.title_cursor, app.state.titles.len());
        }
        Pane::Note => {
            app.note_scroll = step(app.note_scroll, note_rows(app));
        }
    }
}

/// Rows the open note takes in the pane: title plus body lines.
fn note_rows(app: &App) -> usize {
    app.state
        .session
        .viewing()
        .and_then(|open| open.shown.as_ref())
        .map_or(0, |shown| 1 + display_lines(&shown.body).len())
}

fn jump(app: &mut App, bottom: bool) {
    match app.focus {
        Pane::Tags => {
            let len = app.state.selection.tags().len();
            app.tag_cursor = if bottom { len.saturating_sub(1) } else { 0 };
        }
        Pane::Titles => {
            let len = app.state.titles.len();
            app.title_cursor = if bottom { len.saturating_sub(1) } else { 0 };
        }
        Pane::Note => {
            let rows = note_rows(app);
            app.note_scroll = if bottom { rows.saturating_sub(1) } else { 0 };
        }
    }
}

/// Enter/Space on the focused pane.
fn activate(app: &mut App) {
    match app.focus {
        Pane::Tags => {
            let Some(tag) = app
                .state
                .selection
                .tags()
                .get(app.tag_cursor)
                .map(|t| t.name.clone())
            else {
                return;
            };
            let requests = app.state.toggle_tag(&tag);
            app.send(requests);
            // the list was rebuilt around the selection; stay on the same tag
            if let Some(pos) = app.state.selection.tags().iter().position(|t| t.name == tag) {
                app.tag_cursor = pos;
            }
        }
        Pane::Titles => {
            let Some(id) = app.state.titles.get(app.title_cursor).map(|t| t.id.clone()) else {
                return;
            };
            let requests = app.state.open_note(id);
            app.send(requests);
            app.note_scroll = 0;
        }
        Pane::Note => begin_edit(app),
    }
}

fn begin_edit(app: &mut App) {
    let requests = app.state.begin_edit();
    app.send(requests);
    if app.is_editing() {
        app.focus = Pane::Note;
        app.reset_edit_cursor();
    }
}

/// Start a new note, pre-tagged with the selection. Also reached from the
/// editor, where it abandons the current edit first.
pub(super) fn new_note(app: &mut App) {
    let requests = app.state.new_note();
    app.send(requests);
    if app.is_editing() {
        app.focus = Pane::Note;
        app.reset_edit_cursor();
    }
}
