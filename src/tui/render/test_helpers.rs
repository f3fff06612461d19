use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::memory::MemoryApi;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Run everything in the outbox against `api`, following up on replies
/// until nothing is left to send.
pub fn settle(app: &mut App, api: &mut MemoryApi) {
    loop {
        let requests = app.take_outbox();
        if requests.is_empty() {
            break;
        }
        for request in requests {
            let reply = request.run(api);
            app.receive(reply);
        }
    }
}

/// An app over the demo notebook after its first refresh.
pub fn demo_app() -> (App, MemoryApi) {
    let mut api = MemoryApi::demo();
    let mut app = App::new(Theme::default());
    let start = app.state.start();
    app.send(start);
    settle(&mut app, &mut api);
    (app, api)
}

/// Render the whole screen at the default test size.
pub fn render_app(app: &App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _area| {
        super::render(frame, app);
    })
}
