use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Center the overlay, leaving some margin
    let overlay_area = centered_rect(60, 90, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Browsing", header_style)));
    for (key, desc) in [
        ("Tab/Shift-Tab", "Next/previous pane"),
        ("j/k", "Move down/up"),
        ("g/G", "Top/bottom"),
        ("Enter/Space", "Toggle tag, open note"),
        ("a", "Show all notes"),
        ("e", "Edit open note"),
        ("n", "New note (tagged with selection)"),
        ("d", "Delete open note"),
        ("r", "Reload"),
        ("x", "Dismiss messages"),
        ("q", "Quit"),
    ] {
        add_binding(&mut lines, key, desc, key_style, desc_style);
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Editing", header_style)));
    for (key, desc) in [
        ("Esc/Ctrl-S", "Save and leave the editor"),
        ("Ctrl-X", "Discard changes"),
        ("Ctrl-N", "Discard, start a new note"),
        ("Ctrl-D", "Discard and delete the note"),
        ("Ctrl-A/Ctrl-E", "Line start/end"),
        ("Ctrl-U", "Delete to line start"),
    ] {
        add_binding(&mut lines, key, desc, key_style, desc_style);
    }
    lines.push(Line::from(Span::styled(
        " The first line is the title; #words anywhere are tags.",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(Span::styled(" Help ", header_style))
        .style(Style::default().bg(bg));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!(" {:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
