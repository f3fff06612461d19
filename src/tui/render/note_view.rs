use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::ops::format::display_lines;
use crate::ops::session::{EditSession, EditTarget, EditState, OpenNote};
use crate::tui::app::{App, Pane};
use crate::util::unicode;

use super::{inner, pane_block, scroll_for};

/// Render the note pane for whatever the edit session holds.
pub fn render_note_view(frame: &mut Frame, app: &App, area: Rect) {
    match &app.state.session {
        EditSession::Viewing(open) => render_viewing(frame, app, area, open.as_ref()),
        EditSession::Editing(edit) => render_editing(frame, app, area, edit, false),
        EditSession::Saving { edit, .. } => render_editing(frame, app, area, edit, true),
    }
}

fn placeholder(frame: &mut Frame, app: &App, area: Rect, text: &str) {
    let p = Paragraph::new(format!(" {}", text))
        .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(p, area);
}

fn render_viewing(frame: &mut Frame, app: &App, area: Rect, open: Option<&OpenNote>) {
    let title = match open {
        Some(open) => format!(" Note {} ", open.id),
        None => " Note ".to_string(),
    };
    frame.render_widget(pane_block(app, Pane::Note, title), area);
    let body = inner(area);

    let Some(open) = open else {
        placeholder(frame, app, body, "(no note open)");
        return;
    };
    let Some(shown) = &open.shown else {
        placeholder(frame, app, body, "loading\u{2026}");
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        shown.title.clone(),
        Style::default()
            .fg(app.theme.text_bright)
            .add_modifier(Modifier::BOLD),
    ))];
    let text_style = Style::default().fg(app.theme.text);
    lines.extend(
        display_lines(&shown.body)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, text_style))),
    );

    let height = body.height as usize;
    let scroll = app.note_scroll.min(lines.len().saturating_sub(height));
    let visible: Vec<Line> = lines.into_iter().skip(scroll).collect();
    let p = Paragraph::new(visible)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(app.theme.background));
    frame.render_widget(p, body);
}

fn render_editing(frame: &mut Frame, app: &App, area: Rect, edit: &EditState, saving: bool) {
    let title = match (&edit.target, saving) {
        (_, true) => " Saving\u{2026} ".to_string(),
        (EditTarget::New, false) => " New note ".to_string(),
        (EditTarget::Existing(id), false) => format!(" Editing {} ", id),
    };
    frame.render_widget(pane_block(app, Pane::Note, title), area);
    let body = inner(area);
    if body.width == 0 || body.height == 0 {
        return;
    }

    let height = body.height as usize;
    let width = body.width as usize;
    let cursor = app.edit_cursor;
    let scroll = scroll_for(cursor.line, height);

    let buffer_lines: Vec<&str> = edit.buffer.split('\n').collect();
    let cursor_line = buffer_lines.get(cursor.line).copied().unwrap_or("");
    let col = unicode::byte_offset_to_display_col(cursor_line, cursor.col.min(cursor_line.len()));
    // first visible cell, shared by every row so columns line up
    let hscroll = scroll_for(col, width);

    let (title_style, text_style) = if saving {
        let dim = Style::default().fg(app.theme.dim);
        (dim, dim)
    } else {
        (
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(app.theme.text),
        )
    };

    let lines: Vec<Line> = buffer_lines
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, line)| {
            // first line is the title
            let style = if i == 0 { title_style } else { text_style };
            let from = unicode::display_col_to_byte_offset(line, hscroll);
            let tail = line.get(from..).unwrap_or("");
            Line::from(Span::styled(unicode::truncate_to_width(tail, width), style))
        })
        .collect();
    let p = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(p, body);

    if saving {
        return;
    }
    let x = body.x + ((col - hscroll).min(width - 1) as u16);
    let y = body.y + ((cursor.line - scroll) as u16);
    frame.set_cursor_position(Position::new(x, y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteId;
    use crate::tui::app::EditCursor;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(40, 7, |frame, area| render_note_view(frame, app, area))
    }

    #[test]
    fn nothing_open() {
        let (app, _api) = demo_app();
        assert!(render(&app).contains("(no note open)"));
    }

    #[test]
    fn shows_title_then_body_lines() {
        let (mut app, mut api) = demo_app();
        let requests = app.state.open_note(NoteId::from("1"));
        app.send(requests);
        settle(&mut app, &mut api);
        insta::assert_snapshot!(render(&app), @r"
        ┌ Note 1 ──────────────────────────────┐
        │Grocery List                          │
        │milk, eggs, coffee                    │
        │#home #errands                        │
        │                                      │
        │                                      │
        └──────────────────────────────────────┘
        ");
    }

    #[test]
    fn loading_until_the_note_arrives() {
        let (mut app, _api) = demo_app();
        let requests = app.state.open_note(NoteId::from("1"));
        app.send(requests);
        assert!(render(&app).contains("loading\u{2026}"));
    }

    #[test]
    fn markup_in_a_body_is_shown_literally() {
        let (mut app, mut api) = demo_app();
        let id = api.insert("Markup", "a <br> b & c");
        let requests = app.state.open_note(id);
        app.send(requests);
        settle(&mut app, &mut api);
        assert!(render(&app).contains("a <br> b & c"));
    }

    #[test]
    fn cursor_follows_the_edit_position() {
        let (mut app, mut api) = demo_app();
        let requests = app.state.open_note(NoteId::from("3"));
        app.send(requests);
        settle(&mut app, &mut api);
        let requests = app.state.begin_edit();
        app.send(requests);
        app.edit_cursor = EditCursor { line: 1, col: 4 };

        let backend = ratatui::backend::TestBackend::new(40, 7);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_note_view(frame, &app, frame.area()))
            .unwrap();
        // one cell of border on each side
        let pos = terminal.get_cursor_position().unwrap();
        assert_eq!((pos.x, pos.y), (5, 2));

        let out = render(&app);
        assert!(out.contains("Editing 3"));
        assert!(out.contains("Standup Notes"));
    }

    #[test]
    fn long_lines_scroll_sideways_with_the_cursor() {
        let (mut app, _api) = demo_app();
        let requests = app.state.new_note();
        app.send(requests);
        let long = format!("{} END", "abcdefghij".repeat(6));
        *app.state.session.buffer_mut().unwrap() = format!("Title\n{}", long);
        app.edit_cursor = EditCursor {
            line: 1,
            col: long.len(),
        };

        let backend = ratatui::backend::TestBackend::new(40, 7);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_note_view(frame, &app, frame.area()))
            .unwrap();
        // 64 cells of text, 38 inside the border: the cursor sits in the last one
        let pos = terminal.get_cursor_position().unwrap();
        assert_eq!((pos.x, pos.y), (38, 2));

        let out = render(&app);
        let row = out.lines().nth(2).unwrap();
        assert!(row.contains("hij END"));
        assert!(!row.contains('\u{2026}'));

        // back at the start of the line nothing is shifted
        app.edit_cursor = EditCursor { line: 1, col: 0 };
        let out = render(&app);
        assert!(out.lines().nth(1).unwrap().contains("Title"));
        assert!(out.lines().nth(2).unwrap().starts_with("│abcdefghij"));
    }

    #[test]
    fn new_note_title() {
        let (mut app, _api) = demo_app();
        let requests = app.state.new_note();
        app.send(requests);
        assert!(render(&app).contains("New note"));
    }
}
