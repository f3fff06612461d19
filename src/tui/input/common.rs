use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ---------------------------------------------------------------------------
// Multi-line buffer helpers

/// Convert (line, col) to absolute byte offset in a multi-line buffer.
pub(super) fn multiline_pos_to_offset(text: &str, line: usize, col: usize) -> usize {
    let mut offset = 0;
    for (i, l) in text.split('\n').enumerate() {
        if i == line {
            return offset + col.min(l.len());
        }
        offset += l.len() + 1;
    }
    text.len()
}

/// Convert absolute byte offset to (line, col) in a multi-line buffer.
pub(super) fn offset_to_multiline_pos(text: &str, offset: usize) -> (usize, usize) {
    let mut remaining = offset;
    for (i, line) in text.split('\n').enumerate() {
        if remaining <= line.len() {
            return (i, remaining);
        }
        remaining -= line.len() + 1;
    }
    let line_count = text.split('\n').count();
    let last_len = text.split('\n').next_back().map_or(0, |l| l.len());
    (line_count.saturating_sub(1), last_len)
}

// ---------------------------------------------------------------------------
// Kitty keyboard protocol normalizer

/// Map a base key to its US-layout shifted symbol.
/// Returns None if the key is not a shiftable symbol (or is already shifted).
pub(super) fn shift_symbol(c: char) -> Option<char> {
    match c {
        '`' => Some('~'),
        '1' => Some('!'),
        '2' => Some('@'),
        '3' => Some('#'),
        '4' => Some('$'),
        '5' => Some('%'),
        '6' => Some('^'),
        '7' => Some('&'),
        '8' => Some('*'),
        '9' => Some('('),
        '0' => Some(')'),
        '-' => Some('_'),
        '=' => Some('+'),
        '[' => Some('{'),
        ']' => Some('}'),
        '\\' => Some('|'),
        ';' => Some(':'),
        '\'' => Some('"'),
        ',' => Some('<'),
        '.' => Some('>'),
        '/' => Some('?'),
        _ => None,
    }
}

/// Normalize key events from terminals using the kitty keyboard protocol,
/// which sends `Char(base) + SHIFT` where other terminals send the shifted
/// character. A no-op for traditional terminals.
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if let Some(shifted) = shift_symbol(c) {
            // '#' arrives as Shift+3 here, and tags depend on it
            key.code = KeyCode::Char(shifted);
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_round_trip_across_lines() {
        let text = "Title\nbody line\n";
        assert_eq!(multiline_pos_to_offset(text, 1, 4), 10);
        assert_eq!(offset_to_multiline_pos(text, 10), (1, 4));
        assert_eq!(multiline_pos_to_offset(text, 2, 0), text.len());
        assert_eq!(offset_to_multiline_pos(text, text.len()), (2, 0));
        // col past the end of a line clamps to it
        assert_eq!(multiline_pos_to_offset(text, 0, 99), 5);
    }

    #[test]
    fn kitty_shift_digits_become_symbols() {
        let key = normalize_key(KeyEvent::new(KeyCode::Char('3'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('#'));
        assert!(!key.modifiers.contains(KeyModifiers::SHIFT));

        let key = normalize_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('G'));
    }
}
