pub mod help_overlay;
pub mod note_view;
pub mod status_row;
pub mod tags_view;
pub mod titles_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders};

use super::app::{App, Pane};
use crate::util::unicode;

/// Draw the whole screen: three panes, the status row, help on top.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: panes | status row (1 row)
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(22),
            Constraint::Percentage(30),
            Constraint::Min(10),
        ])
        .split(rows[0]);

    tags_view::render_tags_view(frame, app, panes[0]);
    titles_view::render_titles_view(frame, app, panes[1]);
    note_view::render_note_view(frame, app, panes[2]);

    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, rows[1]);
}

/// Bordered block for a pane; the focused pane gets the highlight border.
pub(super) fn pane_block<'a>(app: &App, pane: Pane, title: String) -> Block<'a> {
    let focused = app.focus == pane;
    let border = if focused {
        app.theme.selection_border
    } else {
        app.theme.dim
    };
    let title_style = if focused {
        Style::default()
            .fg(app.theme.text_bright)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(app.theme.background))
        .title(Span::styled(title, title_style))
        .style(Style::default().bg(app.theme.background))
}

/// First row to show so that `cursor` stays visible in `height` rows.
pub(super) fn scroll_for(cursor: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    cursor.saturating_sub(height - 1)
}

/// Pad a row of spans with `style` out to `width` cells.
pub(super) fn pad_spans<'a>(spans: &mut Vec<Span<'a>>, width: usize, style: Style) {
    let used: usize = spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

/// The inner area of a bordered pane.
pub(super) fn inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}
