// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Display-width aware wrapping for the input box and the chat pane.
//!
//! [`wrap_content`] places the cursor of the multiline input box.
//! [`wrap_line`] pre-wraps styled chat lines so the scroll offset counts
//! exactly the rows that are drawn.  Wide (CJK / emoji) characters count as
//! two columns via `unicode_width`.

use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Output of [`wrap_content`].
#[derive(Debug, PartialEq, Eq)]
pub struct WrapState {
    /// Visual lines; always at least one (possibly `""`).
    pub lines: Vec<String>,
    pub cursor_row: usize,
    /// Display-column offset within `lines[cursor_row]`.
    pub cursor_col: usize,
}

fn char_width(ch: char) -> usize {
    if ch == '\n' {
        0
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(1)
    }
}

/// Wrap `content` into visual lines of at most `width` display columns and
/// locate `cursor_byte` in the result.
///
/// `'\n'` always starts a new line; a character that would overflow `width`
/// starts a new line.  A `width` of zero disables soft-wrapping.
pub fn wrap_content(content: &str, width: usize, cursor_byte: usize) -> WrapState {
    let cursor_byte = cursor_byte.min(content.len());

    let mut lines: Vec<String> = Vec::new();
    let mut cur_line = String::new();
    let mut cur_col = 0;
    let mut cursor = None;

    for (byte, ch) in content.char_indices() {
        let w = char_width(ch);
        if width > 0 && ch != '\n' && w > 0 && cur_col + w > width {
            lines.push(std::mem::take(&mut cur_line));
            cur_col = 0;
        }
        if cursor.is_none() && byte == cursor_byte {
            cursor = Some((lines.len(), cur_col));
        }
        if ch == '\n' {
            lines.push(std::mem::take(&mut cur_line));
            cur_col = 0;
        } else {
            cur_line.push(ch);
            cur_col += w;
        }
    }

    let (mut row, mut col) = cursor.unwrap_or((lines.len(), cur_col));
    // A full final line puts the end-of-text cursor on the next row.
    if cursor.is_none() && width > 0 && col >= width {
        row += 1;
        col = 0;
    }

    lines.push(cur_line);
    while row >= lines.len() {
        lines.push(String::new());
    }

    WrapState { lines, cursor_row: row, cursor_col: col }
}

/// Keep `cursor_row` inside a window of `visible_rows` starting at `scroll`.
pub fn adjust_scroll(cursor_row: usize, visible_rows: usize, scroll: &mut usize) {
    if visible_rows == 0 {
        return;
    }
    if cursor_row < *scroll {
        *scroll = cursor_row;
    } else if cursor_row >= *scroll + visible_rows {
        *scroll = cursor_row + 1 - visible_rows;
    }
}

/// Break a styled line into rows of at most `width` display columns,
/// keeping each span's style.  A `width` of zero returns the line as is.
pub fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line.clone()];
    }
    let mut rows = Vec::new();
    let mut row: Vec<Span<'static>> = Vec::new();
    let mut col = 0;
    for span in &line.spans {
        let mut buf = String::new();
        for ch in span.content.chars() {
            let w = char_width(ch);
            if col > 0 && col + w > width {
                if !buf.is_empty() {
                    row.push(Span::styled(std::mem::take(&mut buf), span.style));
                }
                rows.push(Line::from(std::mem::take(&mut row)));
                col = 0;
            }
            buf.push(ch);
            col += w;
        }
        if !buf.is_empty() {
            row.push(Span::styled(buf, span.style));
        }
    }
    rows.push(Line::from(row));
    rows
}

/// Pre-wrap every line for a pane `width` columns wide.
pub fn wrap_lines(lines: &[Line<'static>], width: usize) -> Vec<Line<'static>> {
    lines.iter().flat_map(|l| wrap_line(l, width)).collect()
}
