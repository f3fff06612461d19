use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Pane};
use crate::util::unicode;

use super::{inner, pad_spans, pane_block, scroll_for};

pub fn render_titles_view(frame: &mut Frame, app: &App, area: Rect) {
    let titles = &app.state.titles;
    let title = format!(" Notes ({}) ", titles.len());
    frame.render_widget(pane_block(app, Pane::Titles, title), area);

    let body = inner(area);
    let bg = app.theme.background;
    if titles.is_empty() {
        let empty =
            Paragraph::new(" No matching notes").style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, body);
        return;
    }

    let width = body.width as usize;
    let height = body.height as usize;
    let focused = app.focus == Pane::Titles;
    let open = app.state.session.open_id();
    let scroll = scroll_for(app.title_cursor, height);

    let lines: Vec<Line> = titles
        .entries()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, entry)| {
            let is_cursor = focused && i == app.title_cursor;
            let is_open = open == Some(&entry.id);
            let row_bg = if is_cursor { app.theme.selection_bg } else { bg };

            let marker = if is_open { "\u{25B8} " } else { "  " };
            let (text, mut style) = if entry.title.is_empty() {
                ("(untitled)", Style::default().fg(app.theme.dim))
            } else {
                (entry.title.as_str(), Style::default().fg(app.theme.text))
            };
            if is_open {
                style = style.fg(app.theme.text_bright).add_modifier(Modifier::BOLD);
            }

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(app.theme.highlight).bg(row_bg)),
                Span::styled(
                    unicode::truncate_to_width(text, width.saturating_sub(2)),
                    style.bg(row_bg),
                ),
            ];
            pad_spans(&mut spans, width, Style::default().bg(row_bg));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), body);
}
