//! Terminal-cell and grapheme arithmetic for the panes and the editor.
//!
//! Editor cursors are byte offsets into a line; everything on screen is in
//! cells. These helpers convert between the two without splitting a
//! grapheme cluster.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const TAB_CELLS: usize = 4;

/// Display width in terminal cells. Tabs count as four cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" {
        TAB_CELLS
    } else {
        UnicodeWidthStr::width(g)
    }
}

/// Fit `s` into `max_cells`, ending with `…` when something was cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Start of the grapheme after the one at `byte_offset`; None at the end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let rest = s.get(byte_offset..).filter(|r| !r.is_empty())?;
    let len = rest.graphemes(true).next().map_or(rest.len(), str::len);
    Some(byte_offset + len)
}

/// Start of the grapheme before `byte_offset`; None at the start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let head = s.get(..byte_offset).filter(|h| !h.is_empty())?;
    head.grapheme_indices(true).next_back().map(|(i, _)| i)
}

/// Cells taken by the text before `byte_offset`.
pub fn byte_offset_to_display_col(s: &str, byte_offset: usize) -> usize {
    let end = byte_offset.min(s.len());
    s.get(..end).map_or(0, display_width)
}

/// Byte offset of the grapheme covering cell `target_col`. A column inside a
/// wide character lands on that character; past the end gives `s.len()`.
pub fn display_col_to_byte_offset(s: &str, target_col: usize) -> usize {
    let mut col = 0;
    for (i, g) in s.grapheme_indices(true) {
        let w = grapheme_width(g);
        if col + w > target_col {
            return i;
        }
        col += w;
    }
    s.len()
}

fn is_blank(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word at or before `byte_offset` (whitespace-delimited).
pub fn word_boundary_left(s: &str, byte_offset: usize) -> usize {
    let Some(head) = s.get(..byte_offset) else {
        return 0;
    };
    let graphemes: Vec<(usize, &str)> = head.grapheme_indices(true).collect();
    let mut idx = graphemes.len();
    while idx > 0 && is_blank(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_blank(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(0, |(i, _)| *i)
}

/// Start of the next word after `byte_offset`, or the end of the line.
pub fn word_boundary_right(s: &str, byte_offset: usize) -> usize {
    let Some(tail) = s.get(byte_offset..) else {
        return s.len();
    };
    tail.grapheme_indices(true)
        .skip_while(|(_, g)| !is_blank(g))
        .find(|(_, g)| !is_blank(g))
        .map_or(s.len(), |(i, _)| byte_offset + i)
}
