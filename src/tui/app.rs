use std::io;
use std::time::Duration;

use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::io::api::connect;
use crate::io::worker::Worker;
use crate::model::config::ClientConfig;
use crate::ops::client::ClientState;
use crate::ops::request::{Reply, Request};

use super::input;
use super::render;
use super::theme::Theme;

/// Which pane has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Tags,
    Titles,
    Note,
}

impl Pane {
    pub fn next(self) -> Pane {
        match self {
            Pane::Tags => Pane::Titles,
            Pane::Titles => Pane::Note,
            Pane::Note => Pane::Tags,
        }
    }

    pub fn prev(self) -> Pane {
        match self {
            Pane::Tags => Pane::Note,
            Pane::Titles => Pane::Tags,
            Pane::Note => Pane::Titles,
        }
    }
}

/// Cursor inside the edit buffer: line index and byte offset within that line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditCursor {
    pub line: usize,
    pub col: usize,
}

/// Main application state
pub struct App {
    pub state: ClientState,
    pub theme: Theme,
    pub focus: Pane,
    pub should_quit: bool,
    /// Help overlay visible
    pub show_help: bool,
    pub show_key_hints: bool,
    /// Cursor in the tag pane
    pub tag_cursor: usize,
    /// Cursor in the title pane
    pub title_cursor: usize,
    /// First visible row of the note pane
    pub note_scroll: usize,
    pub edit_cursor: EditCursor,
    /// Requests produced by handlers, waiting for the worker
    outbox: Vec<Request>,
    /// Number of requests the worker has not answered yet
    pub pending: usize,
    /// A save landed; move the title cursor onto the open note once the
    /// refreshed list lists it
    follow_open_note: bool,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        App {
            state: ClientState::new(),
            theme,
            focus: Pane::Tags,
            should_quit: false,
            show_help: false,
            show_key_hints: false,
            tag_cursor: 0,
            title_cursor: 0,
            note_scroll: 0,
            edit_cursor: EditCursor::default(),
            outbox: Vec::new(),
            pending: 0,
            follow_open_note: false,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut app = App::new(Theme::from_config(&config.ui));
        app.show_key_hints = config.ui.show_key_hints;
        app
    }

    /// Queue requests for the worker.
    pub fn send(&mut self, requests: Vec<Request>) {
        self.outbox.extend(requests);
    }

    pub fn take_outbox(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub fn outbox(&self) -> &[Request] {
        &self.outbox
    }

    /// Fold a finished request into state and queue its follow-ups.
    pub fn receive(&mut self, reply: Reply) {
        let was_editing = self.state.session.is_editing();
        let saved = matches!(reply.request, Request::SaveNote(_)) && reply.result.is_ok();
        let titles = matches!(reply.request, Request::ListTitles(_));
        let more = self.state.apply_reply(reply);
        self.send(more);
        if !was_editing && self.state.session.is_editing() {
            // failed save: the editor comes back, cursor stays where it was
            self.clamp_edit_cursor();
        }
        self.follow_open_note |= saved;
        if titles && self.follow_open_note {
            self.cursor_to_open_note();
        }
        self.clamp_cursors();
    }

    fn cursor_to_open_note(&mut self) {
        let Some(id) = self.state.session.open_id() else {
            return;
        };
        if let Some(row) = self.state.titles.position(id) {
            self.title_cursor = row;
            self.follow_open_note = false;
        }
    }

    /// Keep list cursors inside their lists.
    pub fn clamp_cursors(&mut self) {
        let tags = self.state.selection.tags().len();
        self.tag_cursor = self.tag_cursor.min(tags.saturating_sub(1));
        let titles = self.state.titles.len();
        self.title_cursor = self.title_cursor.min(titles.saturating_sub(1));
    }

    pub fn clamp_edit_cursor(&mut self) {
        let Some(buffer) = self.state.session.buffer() else {
            self.edit_cursor = EditCursor::default();
            return;
        };
        let lines: Vec<&str> = buffer.split('\n').collect();
        let line = self.edit_cursor.line.min(lines.len().saturating_sub(1));
        let len = lines.get(line).map_or(0, |l| l.len());
        self.edit_cursor = EditCursor {
            line,
            col: self.edit_cursor.col.min(len),
        };
    }

    /// Place the cursor for a fresh edit: end of the title line for an
    /// existing note, start of the (blank) title for a new one.
    pub fn reset_edit_cursor(&mut self) {
        let title_len = self
            .state
            .session
            .buffer()
            .and_then(|b| b.split('\n').next())
            .map_or(0, str::len);
        self.edit_cursor = EditCursor {
            line: 0,
            col: title_len,
        };
        self.note_scroll = 0;
    }

    pub fn is_editing(&self) -> bool {
        self.state.session.is_editing()
    }
}

/// Run the TUI application
pub fn run(config: &ClientConfig, demo: bool) -> Result<(), Box<dyn std::error::Error>> {
    let api = connect(config, demo)?;
    let mut worker = Worker::spawn(api)?;

    let mut app = App::from_config(config);
    let start = app.state.start();
    app.send(start);
    info!(server = %config.server.base_url, demo, "starting notes browser");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &mut worker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &mut Worker,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let outgoing = app.take_outbox();
        if !outgoing.is_empty() {
            debug!(count = outgoing.len(), "submitting requests");
            worker.submit(outgoing);
        }
        for reply in worker.poll() {
            app.receive(reply);
        }
        app.pending = worker.in_flight() + app.outbox().len();

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memory::MemoryApi;
    use crate::model::NoteId;
    use crate::tui::render::test_helpers::settle;

    #[test]
    fn pane_focus_cycles() {
        assert_eq!(Pane::Tags.next(), Pane::Titles);
        assert_eq!(Pane::Note.next(), Pane::Tags);
        assert_eq!(Pane::Tags.prev(), Pane::Note);
    }

    #[test]
    fn cursors_follow_shrinking_lists() {
        let mut api = MemoryApi::demo();
        let mut app = App::new(Theme::default());
        let start = app.state.start();
        app.send(start);
        settle(&mut app, &mut api);
        app.title_cursor = 3;

        let requests = app.state.toggle_tag("work");
        app.send(requests);
        settle(&mut app, &mut api);
        assert_eq!(app.state.titles.len(), 2);
        assert_eq!(app.title_cursor, 1);
    }

    #[test]
    fn saved_new_note_takes_the_title_cursor() {
        let mut api = MemoryApi::demo();
        let mut app = App::new(Theme::default());
        let start = app.state.start();
        app.send(start);
        settle(&mut app, &mut api);

        app.state.new_note();
        app.state.session.buffer_mut().unwrap().insert_str(0, "Fresh");
        let requests = app.state.blur();
        app.send(requests);
        settle(&mut app, &mut api);

        let under_cursor = app.state.titles.get(app.title_cursor).unwrap();
        assert_eq!(under_cursor.id, NoteId::from("5"));
    }

    #[test]
    fn edit_cursor_starts_after_title() {
        let mut api = MemoryApi::demo();
        let mut app = App::new(Theme::default());
        let requests = app.state.open_note(NoteId::from("3"));
        app.send(requests);
        settle(&mut app, &mut api);
        app.state.begin_edit();
        app.reset_edit_cursor();
        assert_eq!(app.edit_cursor, EditCursor { line: 0, col: 13 });
    }
}
