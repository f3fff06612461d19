use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::session::EditSession;
use crate::tui::app::App;
use crate::util::unicode;

/// Render the status row (bottom of screen): mode, selection, pending
/// requests, then the latest notice and how many sit behind it. Key hints sit at the right edge.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mode = match app.state.session {
        EditSession::Viewing(_) => "VIEW",
        EditSession::Editing(_) => "EDIT",
        EditSession::Saving { .. } => "SAVE",
    };
    let mut spans = vec![Span::styled(
        format!(" {} ", mode),
        Style::default()
            .fg(bg)
            .bg(app.theme.highlight)
            .add_modifier(Modifier::BOLD),
    )];

    let selection = app.state.selection.current();
    let scope = if selection.is_empty() {
        "all notes".to_string()
    } else {
        selection
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ")
    };
    spans.push(Span::styled(
        format!(" {}", scope),
        Style::default().fg(app.theme.cyan).bg(bg),
    ));

    if app.pending > 0 {
        spans.push(Span::styled(
            format!("  \u{21BB}{}", app.pending),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }

    let notices = app.state.notices();
    if let Some(notice) = notices.last() {
        spans.push(Span::styled(
            format!("  {}", notice.message),
            Style::default()
                .fg(app.theme.notice_color(notice.severity))
                .bg(bg),
        ));
        // older notices are still there until dismissed with x
        if notices.len() > 1 {
            spans.push(Span::styled(
                format!(" (+{})", notices.len() - 1),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
    }

    let hint = match (app.show_key_hints, app.is_editing()) {
        (false, _) => "",
        (true, true) => "Esc save  ^X cancel  ^N new  ^D delete",
        (true, false) => "? help  e edit  n new  d delete  q quit",
    };
    let content_width: usize = spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum();
    let hint_width = hint.chars().count();
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn shows_mode_and_scope() {
        let (app, _api) = demo_app();
        insta::assert_snapshot!(render(&app), @" VIEW  all notes");
    }

    #[test]
    fn shows_selection_and_latest_notice() {
        let (mut app, mut api) = demo_app();
        let requests = app.state.toggle_tag("work");
        app.send(requests);
        settle(&mut app, &mut api);
        let requests = app.state.delete_note();
        app.send(requests);
        let out = render(&app);
        assert!(out.contains("#work"));
        assert!(out.contains("no note open"));
    }

    #[test]
    fn stacked_notices_show_a_count_until_dismissed() {
        let (mut app, _api) = demo_app();
        app.state.delete_note();
        app.state.delete_note();
        app.state.delete_note();
        assert!(render(&app).contains("no note open (+2)"));

        app.state.dismiss_notices();
        app.state.delete_note();
        let out = render(&app);
        assert!(out.contains("no note open"));
        assert!(!out.contains("(+"));
    }

    #[test]
    fn pending_count_and_hints() {
        let (mut app, _api) = demo_app();
        app.pending = 2;
        app.show_key_hints = true;
        let out = render(&app);
        assert!(out.contains("\u{21BB}2"));
        assert!(out.ends_with("q quit"));
    }
}
