// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Chat pane rendering and scrolling.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::{
    app::App,
    markdown::{render_message, render_pending, StyledLines},
    wrap::{adjust_scroll, wrap_content, wrap_lines},
};

const INTRO: &str =
    "💬 Start a conversation with Gemini AI! Ask questions, get summaries, or explore ideas instantly.";
const NO_THREAD: &str = "No chat selected. Press ^N to start a new one.";

impl App {
    /// Rebuild the wrapped chat lines for the current thread.
    pub(crate) fn rerender_chat(&mut self) {
        let palette = self.palette();
        let muted = Style::default().fg(palette.muted);
        let mut lines: StyledLines = vec![
            Line::from(Span::styled(INTRO, muted.add_modifier(Modifier::ITALIC))),
            Line::default(),
        ];

        let store = self.session.store();
        match store.current() {
            Some(thread) => {
                for msg in &thread.messages {
                    lines.extend(render_message(msg, &palette));
                }
                if let Some(f) = &self.in_flight {
                    if f.thread_id == thread.id {
                        lines.extend(render_pending(&f.revealed, &palette));
                    }
                }
            }
            None => lines.push(Line::from(Span::styled(NO_THREAD, muted))),
        }

        self.chat_lines = wrap_lines(&lines, self.chat_width);
        self.scroll_to_bottom();
    }

    fn max_scroll(&self) -> u16 {
        u16::try_from(self.chat_lines.len())
            .unwrap_or(u16::MAX)
            .saturating_sub(self.chat_height)
    }

    pub(crate) fn scroll_up(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
        self.auto_scroll = false;
    }

    pub(crate) fn scroll_down(&mut self, n: u16) {
        let max = self.max_scroll();
        self.scroll_offset = self.scroll_offset.saturating_add(n).min(max);
        if self.scroll_offset >= max {
            self.auto_scroll = true;
        }
    }

    pub(crate) fn scroll_to_bottom(&mut self) {
        if self.auto_scroll {
            self.scroll_offset = self.max_scroll();
        }
    }

    /// Keep the cursor row inside the visible part of the input box.
    pub(crate) fn adjust_input_scroll(&mut self) {
        let w = self.last_input_inner_width;
        let h = self.last_input_inner_height;
        if w == 0 || h == 0 {
            return;
        }
        let wrap = wrap_content(&self.input_buffer, w, self.input_cursor);
        adjust_scroll(wrap.cursor_row, h, &mut self.input_scroll_offset);
    }
}

#[cfg(test)]
mod tests {
    use crate::app::testing::app_with;
    use gemchat_core::GREETING;

    #[test]
    fn greeting_is_rendered_for_fresh_state() {
        let (app, _) = app_with(vec![]);
        let text = app.chat_text();
        assert!(text.iter().any(|l| l == "Gemini"));
        assert!(text.iter().any(|l| l.contains(&GREETING[..20])));
    }

    #[test]
    fn no_current_thread_shows_hint() {
        let (mut app, _) = app_with(vec![]);
        let id = app.session.store().current_id().unwrap();
        app.session.store_mut().delete(id);
        app.rerender_chat();
        assert!(app.chat_text().iter().any(|l| l.contains("^N")));
    }

    #[test]
    fn scrolling_stops_at_bounds() {
        let (mut app, _) = app_with(vec![]);
        app.chat_height = 2;
        app.rerender_chat();
        let max = app.chat_lines.len() as u16 - 2;
        assert_eq!(app.scroll_offset, max, "follows the bottom");
        app.scroll_up(100);
        assert_eq!(app.scroll_offset, 0);
        assert!(!app.auto_scroll);
        app.scroll_down(100);
        assert_eq!(app.scroll_offset, max);
        assert!(app.auto_scroll);
    }

    #[test]
    fn huge_conversations_clamp_instead_of_wrapping() {
        let (mut app, _) = app_with(vec![]);
        app.chat_height = 10;
        app.chat_lines = vec![ratatui::text::Line::default(); 70_000];
        app.auto_scroll = true;
        app.scroll_to_bottom();
        assert_eq!(app.scroll_offset, u16::MAX - 10);
        app.scroll_up(5);
        app.scroll_down(u16::MAX);
        assert_eq!(app.scroll_offset, u16::MAX - 10);
    }
}
