//! Conversions between the three forms a note body takes.
//!
//! - **storage**: what the backend keeps. Plain text, `\n` line breaks.
//! - **display**: what the note pane shows. Markup-escaped text with `<br>`
//!   line breaks.
//! - **edit**: what the editor holds. Plain text, `\n` line breaks.
//!
//! Going to display, `&` becomes `&amp;` and `<` becomes `&lt;` before line
//! breaks become `<br>`, so a literal `<br>` typed by the user is shown as
//! text and comes back unchanged. Coming from display, any spelling of a
//! break tag (`<br>`, `<br/>`, `<br />`, `</br>`, any case) becomes `\n`,
//! then the two entities are unescaped.

use std::sync::LazyLock;

use regex::Regex;

/// Line-break markup in display form
pub const BREAK: &str = "<br>";

static BREAK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?br\s*/?>").expect("valid break-tag pattern"));

/// Backend text to display markup.
pub fn storage_to_display(stored: &str) -> String {
    to_display(&normalize_newlines(stored))
}

/// Display markup back to backend text.
pub fn display_to_storage(display: &str) -> String {
    from_display(display)
}

/// Display markup to editor text.
pub fn display_to_edit(display: &str) -> String {
    from_display(display)
}

/// Editor text to display markup.
pub fn edit_to_display(edit: &str) -> String {
    to_display(&normalize_newlines(edit))
}

/// Editor text to backend text.
pub fn edit_to_storage(edit: &str) -> String {
    normalize_newlines(edit)
}

/// Split display markup into the plain lines it shows.
pub fn display_lines(display: &str) -> Vec<String> {
    display_to_edit(display)
        .split('\n')
        .map(str::to_string)
        .collect()
}

fn to_display(plain: &str) -> String {
    let mut out = String::with_capacity(plain.len());
    for c in plain.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '\n' => out.push_str(BREAK),
            c => out.push(c),
        }
    }
    out
}

fn from_display(display: &str) -> String {
    let broken = BREAK_TAG.replace_all(display, "\n");
    // &amp; last, so "&amp;lt;" decodes to "&lt;" and not "<"
    broken.replace("&lt;", "<").replace("&amp;", "&")
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split editor text on the first line break into (title, body).
pub fn split_title(edit: &str) -> (String, String) {
    match edit.split_once('\n') {
        Some((title, body)) => (title.trim_end().to_string(), body.to_string()),
        None => (edit.trim_end().to_string(), String::new()),
    }
}

/// Join title and body into editor text: title on line 1, body from line 2.
pub fn join_title(title: &str, body: &str) -> String {
    format!("{}\n{}", title, body)
}
