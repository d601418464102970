// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Inline `**bold**` / `*medium*` markup and its rendering into ratatui lines.
//!
//! Only those two markers are recognised.  They do not nest, there is no
//! escaping, and a marker pair never spans lines.

use gemchat_model::{Message, Role};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::widgets::Palette;

/// A styled line ready for Ratatui rendering.
pub type StyledLines = Vec<Line<'static>>;

/// Shown in place of the answer until the first revealed chunk arrives.
pub const THINKING_TEXT: &str = "💭 AI is thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Normal,
    Bold,
    Medium,
}

/// A run of text with one kind.  Borrows from the tokenized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan<'a> {
    pub kind: SpanKind,
    pub text: &'a str,
}

impl<'a> TextSpan<'a> {
    fn normal(text: &'a str) -> Self {
        Self { kind: SpanKind::Normal, text }
    }
}

/// Split at `\n` and tokenize every line.  A trailing newline gives a
/// trailing empty line.
pub fn tokenize(text: &str) -> Vec<Vec<TextSpan<'_>>> {
    text.split('\n').map(tokenize_line).collect()
}

/// Tokenize one line.  An empty line has no spans.
pub fn tokenize_line(line: &str) -> Vec<TextSpan<'_>> {
    let mut spans = Vec::new();
    let mut plain_from = 0;
    let mut pos = 0;
    while let Some(off) = line[pos..].find('*') {
        let star = pos + off;
        match marked_run(&line[star..]) {
            Some((kind, text, len)) => {
                if plain_from < star {
                    spans.push(TextSpan::normal(&line[plain_from..star]));
                }
                spans.push(TextSpan { kind, text });
                pos = star + len;
                plain_from = pos;
            }
            None => pos = star + 1,
        }
    }
    if plain_from < line.len() {
        spans.push(TextSpan::normal(&line[plain_from..]));
    }
    spans
}

/// Match a marked run at the start of `rest`, which begins with `*`.
///
/// Returns the kind, the inner text and the byte length of the whole run
/// including markers.  A `**` pair is preferred; failing that a single `*`
/// pair is tried.  The single-star match `**` (nothing inside) counts as
/// bold.
fn marked_run(rest: &str) -> Option<(SpanKind, &str, usize)> {
    if let Some(after) = rest.strip_prefix("**") {
        if let Some(at) = find_close(after, "**") {
            return Some((SpanKind::Bold, &after[..at], at + 4));
        }
    }
    let after = rest.strip_prefix('*')?;
    let at = find_close(after, "*")?;
    let kind = if at == 0 { SpanKind::Bold } else { SpanKind::Medium };
    Some((kind, &after[..at], at + 2))
}

/// Offset of the first `delim` in `s`, unless a line terminator comes first.
fn find_close(s: &str, delim: &str) -> Option<usize> {
    let at = s.find(delim)?;
    if s[..at].chars().any(is_line_terminator) {
        return None;
    }
    Some(at)
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\r' | '\u{2028}' | '\u{2029}')
}

// ── Rendering ────────────────────────────────────────────────────────────────

/// Role label, body and a trailing blank line for one stored message.
pub fn render_message(msg: &Message, palette: &Palette) -> StyledLines {
    let mut lines = vec![role_line(msg.role, palette)];
    match msg.role {
        Role::User => lines.extend(render_verbatim(&msg.text, palette)),
        Role::Ai => lines.extend(render_answer(&msg.text, palette)),
    }
    lines.push(Line::default());
    lines
}

/// The answer currently being revealed, or the thinking line if nothing has
/// been revealed yet.
pub fn render_pending(revealed: &str, palette: &Palette) -> StyledLines {
    let mut lines = vec![role_line(Role::Ai, palette)];
    if revealed.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {THINKING_TEXT}"),
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.extend(render_answer(revealed, palette));
    }
    lines
}

/// Tokenized body of an AI message, indented two columns.
pub fn render_answer(text: &str, palette: &Palette) -> StyledLines {
    tokenize(text)
        .into_iter()
        .map(|spans| {
            let mut out = vec![Span::raw("  ")];
            out.extend(spans.into_iter().map(|s| {
                let style = match s.kind {
                    SpanKind::Normal => Style::default().fg(palette.text),
                    SpanKind::Bold => Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
                    SpanKind::Medium => Style::default().fg(palette.accent),
                };
                Span::styled(s.text.to_string(), style)
            }));
            Line::from(out)
        })
        .collect()
}

fn render_verbatim(text: &str, palette: &Palette) -> StyledLines {
    text.split('\n')
        .map(|l| Line::from(Span::styled(format!("  {l}"), Style::default().fg(palette.user))))
        .collect()
}

fn role_line(role: Role, palette: &Palette) -> Line<'static> {
    let (label, color) = match role {
        Role::User => ("You", palette.user),
        Role::Ai => ("Gemini", palette.accent),
    };
    Line::from(Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemchat_core::Theme;

    fn kinds<'a>(spans: &[TextSpan<'a>]) -> Vec<(SpanKind, &'a str)> {
        spans.iter().map(|s| (s.kind, s.text)).collect()
    }

    #[test]
    fn bold_and_medium_between_normal_runs() {
        let spans = tokenize_line("a **b** c *d* e");
        assert_eq!(
            kinds(&spans),
            vec![
                (SpanKind::Normal, "a "),
                (SpanKind::Bold, "b"),
                (SpanKind::Normal, " c "),
                (SpanKind::Medium, "d"),
                (SpanKind::Normal, " e"),
            ]
        );
    }

    #[test]
    fn balanced_markers_are_stripped() {
        for line in [
            "**Note:** use *this* one",
            "*a* *b* **c**",
            "plain text",
            "**whole line bold**",
            "mixed **bo ld** and *me dium* end",
        ] {
            let joined: String = tokenize_line(line).iter().map(|s| s.text).collect();
            assert_eq!(joined, line.replace('*', ""), "{line:?}");
        }
    }

    #[test]
    fn unmatched_star_is_plain_text() {
        assert_eq!(kinds(&tokenize_line("2 * 3 = 6")), vec![(SpanKind::Normal, "2 * 3 = 6")]);
        assert_eq!(kinds(&tokenize_line("a *b")), vec![(SpanKind::Normal, "a *b")]);
    }

    #[test]
    fn unclosed_double_star_becomes_empty_bold() {
        assert_eq!(
            kinds(&tokenize_line("**abc")),
            vec![(SpanKind::Bold, ""), (SpanKind::Normal, "abc")]
        );
        assert_eq!(
            kinds(&tokenize_line("***")),
            vec![(SpanKind::Bold, ""), (SpanKind::Normal, "*")]
        );
    }

    #[test]
    fn first_closing_marker_wins() {
        assert_eq!(
            kinds(&tokenize_line("**a*b** c")),
            vec![(SpanKind::Bold, "a*b"), (SpanKind::Normal, " c")]
        );
        assert_eq!(
            kinds(&tokenize_line("*x**y*")),
            vec![(SpanKind::Medium, "x"), (SpanKind::Medium, "y")]
        );
    }

    #[test]
    fn markers_do_not_cross_carriage_return() {
        assert_eq!(kinds(&tokenize_line("*a\rb*")), vec![(SpanKind::Normal, "*a\rb*")]);
        assert_eq!(
            kinds(&tokenize_line("**a\u{2028}b**")),
            vec![(SpanKind::Bold, ""), (SpanKind::Normal, "a\u{2028}b"), (SpanKind::Bold, "")]
        );
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert!(tokenize_line("").is_empty());
    }

    #[test]
    fn text_splits_on_newline_with_trailing_empty_line() {
        let lines = tokenize("**a**\n\nb\n");
        assert_eq!(lines.len(), 4);
        assert_eq!(kinds(&lines[0]), vec![(SpanKind::Bold, "a")]);
        assert!(lines[1].is_empty());
        assert_eq!(kinds(&lines[2]), vec![(SpanKind::Normal, "b")]);
        assert!(lines[3].is_empty());
    }

    #[test]
    fn multibyte_text_around_markers() {
        assert_eq!(
            kinds(&tokenize_line("é *ü* ñ")),
            vec![(SpanKind::Normal, "é "), (SpanKind::Medium, "ü"), (SpanKind::Normal, " ñ")]
        );
    }

    #[test]
    fn user_messages_are_not_tokenized() {
        let p = Palette::for_theme(Theme::Dark);
        let lines = render_message(&Message::user("keep **stars**"), &p);
        assert_eq!(lines[1].spans[0].content, "  keep **stars**");
    }

    #[test]
    fn ai_bold_span_gets_bold_modifier() {
        let p = Palette::for_theme(Theme::Dark);
        let lines = render_message(&Message::ai("x **y**"), &p);
        let body = &lines[1];
        let bold = body.spans.iter().find(|s| s.content == "y").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(lines.last().unwrap().spans.len(), 0, "trailing blank line");
    }

    #[test]
    fn pending_without_text_shows_thinking_line() {
        let p = Palette::for_theme(Theme::Light);
        let lines = render_pending("", &p);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].spans[0].content.contains(THINKING_TEXT));
        assert!(lines[1].spans[0].style.add_modifier.contains(Modifier::ITALIC));
    }
}
