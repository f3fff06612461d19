use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Pane};
use crate::util::unicode;

use super::{inner, pad_spans, pane_block, scroll_for};

/// Render the tag pane: every tag with its count, selected tags marked,
/// tags that cannot narrow the selection further dimmed.
pub fn render_tags_view(frame: &mut Frame, app: &App, area: Rect) {
    let selection = &app.state.selection;
    let title = if selection.is_empty() {
        " Tags ".to_string()
    } else {
        format!(" Tags ({}) ", selection.current().len())
    };
    frame.render_widget(pane_block(app, Pane::Tags, title), area);

    let body = inner(area);
    let bg = app.theme.background;
    let tags = selection.tags();
    if tags.is_empty() {
        let empty = Paragraph::new(" No tags").style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, body);
        return;
    }

    let width = body.width as usize;
    let height = body.height as usize;
    let focused = app.focus == Pane::Tags;
    let scroll = scroll_for(app.tag_cursor, height);

    let lines: Vec<Line> = tags
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, tag)| {
            let is_cursor = focused && i == app.tag_cursor;
            let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
            let selected = selection.is_selected(&tag.name);

            let marker = if selected { "\u{25CF} " } else { "  " };
            let name_color = if !tag.related {
                app.theme.dim
            } else if selected {
                app.theme.highlight
            } else {
                app.theme.tag_color(&tag.name)
            };
            let mut name_style = Style::default().fg(name_color).bg(row_bg);
            if selected {
                name_style = name_style.add_modifier(Modifier::BOLD);
            }

            let count = tag.count.to_string();
            let budget = width.saturating_sub(marker.chars().count() + count.len() + 2);
            let name = unicode::truncate_to_width(&format!("#{}", tag.name), budget);

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(app.theme.highlight).bg(row_bg)),
                Span::styled(name, name_style),
            ];
            let pad = width.saturating_sub(
                marker.chars().count() + unicode::display_width(&spans[1].content) + count.len(),
            );
            spans.push(Span::styled(" ".repeat(pad), Style::default().bg(row_bg)));
            spans.push(Span::styled(
                count,
                Style::default().fg(app.theme.dim).bg(row_bg),
            ));
            pad_spans(&mut spans, width, Style::default().bg(row_bg));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), body);
}
