// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use gemchat_core::{Theme, Thread, ThreadId};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::markdown::StyledLines;
use crate::wrap::WrapState;

// ── Palette ──────────────────────────────────────────────────────────────────

/// Colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub user: Color,
    pub border: Color,
    pub selected_bg: Color,
    pub danger: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                bg: Color::Black,
                text: Color::Gray,
                muted: Color::DarkGray,
                accent: Color::LightBlue,
                user: Color::LightCyan,
                border: Color::DarkGray,
                selected_bg: Color::Blue,
                danger: Color::LightRed,
            },
            Theme::Light => Palette {
                bg: Color::White,
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                user: Color::Magenta,
                border: Color::Gray,
                selected_bg: Color::LightBlue,
                danger: Color::Red,
            },
        }
    }
}

// ── Character sets ────────────────────────────────────────────────────────────

fn busy_char(ascii: bool) -> &'static str {
    if ascii { "* " } else { "⠿ " }
}
fn border_type(ascii: bool) -> BorderType {
    if ascii { BorderType::Plain } else { BorderType::Rounded }
}
fn theme_switch(theme: Theme, ascii: bool) -> String {
    match (theme, ascii) {
        (Theme::Dark, false) => "☀ ○━━● ☾".into(),
        (Theme::Light, false) => "☀ ●━━○ ☾".into(),
        (t, true) => format!("theme: {t}"),
    }
}

// ── Draw functions ────────────────────────────────────────────────────────────

/// Paint the whole frame in the theme background.
pub fn draw_background(frame: &mut Frame, palette: &Palette) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(palette.bg)), area);
}

/// Sidebar label for a thread: its title, plus the message count when
/// there is more than one message.
pub fn sidebar_label(thread: &Thread) -> String {
    let title: String = thread
        .title()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let n = thread.messages.len();
    if n > 1 {
        format!("{title} ({n})")
    } else {
        title
    }
}

/// First list row to draw so that `selected` stays within `rows` visible rows.
pub fn list_offset(selected: Option<usize>, rows: usize) -> usize {
    match selected {
        Some(i) if rows > 0 && i >= rows => i + 1 - rows,
        _ => 0,
    }
}

/// Draw the thread list, scrolled so the current thread is visible.
pub fn draw_sidebar(
    frame: &mut Frame,
    area: Rect,
    threads: &[Thread],
    current: Option<ThreadId>,
    palette: &Palette,
    ascii: bool,
) {
    if area.width == 0 {
        return;
    }
    let block = pane_block("⚡GemChat", palette, ascii);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled(
            "^N new chat  ^D delete",
            Style::default().fg(palette.muted),
        )),
        Line::default(),
    ];

    if threads.is_empty() {
        lines.push(Line::from(Span::styled("No chats yet.", Style::default().fg(palette.muted))));
    }
    let rows = (inner.height as usize).saturating_sub(lines.len());
    let selected = current.and_then(|id| threads.iter().position(|t| t.id == id));
    let offset = list_offset(selected, rows);
    for thread in threads.iter().skip(offset).take(rows) {
        let active = Some(thread.id) == current;
        let style = if active {
            Style::default()
                .fg(palette.text)
                .bg(palette.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        let marker = if active { "> " } else { "  " };
        lines.push(Line::from(Span::styled(format!("{marker}{}", sidebar_label(thread)), style)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Draw the title bar with the theme switch on the right.
pub fn draw_header(
    frame: &mut Frame,
    area: Rect,
    theme: Theme,
    loading: bool,
    provider: &str,
    palette: &Palette,
    ascii: bool,
) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_type(border_type(ascii))
        .border_style(Style::default().fg(palette.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let busy = if loading { busy_char(ascii) } else { "  " };
    let left = Line::from(vec![
        Span::styled(busy, Style::default().fg(palette.accent)),
        Span::styled(provider.to_string(), Style::default().fg(palette.muted)),
    ]);
    let title = Line::from(Span::styled(
        "GemChat",
        Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
    ));
    let right = Line::from(Span::styled(
        format!("{}  ^T ", theme_switch(theme, ascii)),
        Style::default().fg(palette.muted),
    ));

    frame.render_widget(Paragraph::new(left), inner);
    frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), inner);
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), inner);
}

/// Draw the already-wrapped conversation starting at `scroll_offset`.
pub fn draw_chat(
    frame: &mut Frame,
    area: Rect,
    lines: &StyledLines,
    scroll_offset: u16,
    palette: &Palette,
    ascii: bool,
) {
    let block = pane_block("Chat", palette, ascii);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible: Vec<Line<'static>> = lines
        .iter()
        .skip(scroll_offset as usize)
        .take(inner.height as usize)
        .cloned()
        .collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

/// Draw the input box from its wrapped rows.  While an answer is
/// outstanding the box is disabled and shows no cursor.
pub fn draw_input(
    frame: &mut Frame,
    area: Rect,
    wrapped: &WrapState,
    scroll_offset: usize,
    loading: bool,
    palette: &Palette,
    ascii: bool,
) {
    let title = if loading {
        "Waiting for Gemini…"
    } else {
        "Message  [Enter:send  Shift+Enter:newline]"
    };
    let block = pane_block(title, palette, ascii);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let empty = wrapped.lines.iter().all(|l| l.is_empty()) && wrapped.lines.len() == 1;
    let para = if empty {
        Paragraph::new(Span::styled(
            "Ask Gemini anything...",
            Style::default().fg(palette.muted),
        ))
    } else {
        let fg = if loading { palette.muted } else { palette.text };
        let rows: Vec<Line<'static>> = wrapped
            .lines
            .iter()
            .skip(scroll_offset)
            .take(inner.height as usize)
            .map(|l| Line::from(l.clone()))
            .collect();
        Paragraph::new(rows).style(Style::default().fg(fg))
    };
    frame.render_widget(para, inner);

    if !loading {
        if let Some(visible_row) = wrapped.cursor_row.checked_sub(scroll_offset) {
            if visible_row < inner.height as usize {
                let col = (wrapped.cursor_col as u16).min(inner.width.saturating_sub(1));
                frame.set_cursor_position((inner.x + col, inner.y + visible_row as u16));
            }
        }
    }
}

/// Draw the one-line notice under the input box.
pub fn draw_disclaimer(frame: &mut Frame, area: Rect, palette: &Palette) {
    let para = Paragraph::new(Span::styled(
        "AI can make mistakes. Verify important information.",
        Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(para, area);
}

/// Draw the help overlay.
pub fn draw_help(frame: &mut Frame, palette: &Palette, ascii: bool) {
    let area = frame.area();

    let help_text = vec![
        Line::from(Span::styled(
            "  GemChat Key Bindings",
            Style::default().add_modifier(Modifier::BOLD).fg(palette.accent),
        )),
        Line::default(),
        Line::from(" Enter       Send message"),
        Line::from(" S+Enter     Insert newline (^J if S+Enter not available)"),
        Line::from(" ^N          New chat"),
        Line::from(" ^D          Delete current chat"),
        Line::from(" Tab / S+Tab Next / previous chat"),
        Line::from(" ^↑ / ^↓     Previous / next chat"),
        Line::from(" PgUp/PgDn   Scroll conversation"),
        Line::from(" ^Home/^End  Jump to top / bottom"),
        Line::from(" ^T          Toggle dark / light theme"),
        Line::from(" ^B          Show / hide sidebar"),
        Line::from(" ^Y          Copy the last answer"),
        Line::from(" Esc         Stop revealing the current answer"),
        Line::from(" ^C          Quit"),
        Line::from(" F1          Toggle this help"),
        Line::default(),
        Line::from(Span::styled(" Press any key to close", Style::default().fg(palette.muted))),
    ];

    let width = 64u16.min(area.width);
    let height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    let overlay = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type(ascii))
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg).fg(palette.text));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);
    frame.render_widget(Paragraph::new(help_text), inner);
}

/// Draw a one-line status message over the bottom of the chat pane.
pub fn draw_notice(frame: &mut Frame, chat_pane: Rect, text: &str, palette: &Palette) {
    if chat_pane.height < 3 {
        return;
    }
    let area = Rect::new(
        chat_pane.x + 1,
        chat_pane.y + chat_pane.height - 2,
        chat_pane.width.saturating_sub(2),
        1,
    );
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Span::styled(text.to_string(), Style::default().fg(palette.danger))),
        area,
    );
}

// ── Internal helpers ──────────────────────────────────────────────────────────

pub(crate) fn pane_block(title: &str, palette: &Palette, ascii: bool) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD).fg(palette.accent),
        ))
        .borders(Borders::ALL)
        .border_type(border_type(ascii))
        .border_style(Style::default().fg(palette.border))
}
