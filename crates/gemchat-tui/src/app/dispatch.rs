// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Action dispatcher: maps every [`Action`] to its effect on the app.

use gemchat_core::answer_task;
use gemchat_model::Role;
use tracing::{debug, warn};

use crate::{
    app::{App, InFlight},
    keys::Action,
};

impl App {
    /// Apply one action.  Returns `true` when the app should exit.
    pub(crate) fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Help => self.show_help = !self.show_help,

            Action::Submit => self.submit(),

            Action::NewThread => {
                self.session.store_mut().create();
                self.auto_scroll = true;
                self.rerender_chat();
            }
            Action::DeleteThread => self.delete_current_thread(),
            Action::NextThread => self.cycle_thread(1),
            Action::PrevThread => self.cycle_thread(-1),

            Action::ToggleTheme => {
                let theme = self.theme.toggle();
                debug!(%theme, "theme toggled");
                self.rerender_chat();
            }
            Action::ToggleSidebar => self.sidebar_visible = !self.sidebar_visible,
            Action::StopReveal => self.stop_reveal(),
            Action::CopyLastAnswer => self.copy_last_answer(),

            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::ScrollPageUp => self.scroll_up(self.chat_height / 2),
            Action::ScrollPageDown => self.scroll_down(self.chat_height / 2),
            Action::ScrollTop => {
                self.scroll_offset = 0;
                self.auto_scroll = false;
            }
            Action::ScrollBottom => {
                self.auto_scroll = true;
                self.scroll_to_bottom();
            }

            Action::InputChar(c) => {
                self.input_buffer.insert(self.input_cursor, c);
                self.input_cursor += c.len_utf8();
            }
            Action::InputNewline => {
                self.input_buffer.insert(self.input_cursor, '\n');
                self.input_cursor += 1;
            }
            Action::InputBackspace => {
                if self.input_cursor > 0 {
                    let prev = prev_char_boundary(&self.input_buffer, self.input_cursor);
                    self.input_buffer.remove(prev);
                    self.input_cursor = prev;
                }
            }
            Action::InputDelete => {
                if self.input_cursor < self.input_buffer.len() {
                    self.input_buffer.remove(self.input_cursor);
                }
            }
            Action::InputMoveCursorLeft => {
                self.input_cursor = prev_char_boundary(&self.input_buffer, self.input_cursor);
            }
            Action::InputMoveCursorRight => {
                self.input_cursor = next_char_boundary(&self.input_buffer, self.input_cursor);
            }
            Action::InputMoveWordLeft => {
                self.input_cursor = prev_word_boundary(&self.input_buffer, self.input_cursor);
            }
            Action::InputMoveWordRight => {
                self.input_cursor = next_word_boundary(&self.input_buffer, self.input_cursor);
            }
            Action::InputMoveLineStart => self.input_cursor = 0,
            Action::InputMoveLineEnd => self.input_cursor = self.input_buffer.len(),
            Action::InputDeleteToStart => {
                self.input_buffer.drain(..self.input_cursor);
                self.input_cursor = 0;
            }
        }
        false
    }

    /// Send the input box contents.  Blank input, a missing thread, or an
    /// answer already outstanding leave everything as it is.
    pub(crate) fn submit(&mut self) {
        if self.is_loading() {
            return;
        }
        let Some(pending) = self.session.begin_send(&self.input_buffer) else {
            if self.session.store().current_id().is_none() && !self.input_buffer.trim().is_empty() {
                self.notice = Some("No chat selected. Press ^N to start one.".into());
            }
            return;
        };

        self.input_buffer.clear();
        self.input_cursor = 0;
        self.input_scroll_offset = 0;
        self.in_flight = Some(InFlight {
            thread_id: pending.thread_id,
            revealed: String::new(),
            handle: None,
        });

        let provider = self.session.provider();
        let reveal = self.session.reveal_config().clone();
        let tx = self.event_tx.clone();
        tokio::spawn(answer_task(provider, pending, reveal, tx));

        self.auto_scroll = true;
        self.rerender_chat();
    }

    fn delete_current_thread(&mut self) {
        let Some(id) = self.session.store().current_id() else {
            return;
        };
        if let Some(f) = &self.in_flight {
            if f.thread_id == id {
                if let Some(h) = &f.handle {
                    h.cancel();
                }
            }
        }
        self.session.store_mut().delete(id);
        self.auto_scroll = true;
        self.rerender_chat();
    }

    /// Move the selection `step` places through the thread list, wrapping.
    fn cycle_thread(&mut self, step: isize) {
        let store = self.session.store();
        let ids: Vec<_> = store.threads().iter().map(|t| t.id).collect();
        if ids.is_empty() {
            return;
        }
        let at = store
            .current_id()
            .and_then(|id| ids.iter().position(|&t| t == id))
            .unwrap_or(0) as isize;
        let next = (at + step).rem_euclid(ids.len() as isize) as usize;
        self.session.store_mut().select(ids[next]);
        self.auto_scroll = true;
        self.rerender_chat();
    }

    /// Put the current thread's latest answer on the clipboard.
    fn copy_last_answer(&mut self) {
        let answer = self
            .session
            .store()
            .current_messages()
            .iter()
            .rev()
            .find(|m| m.role == Role::Ai)
            .map(|m| m.text.clone());
        let Some(text) = answer else {
            self.notice = Some("No answer to copy.".into());
            return;
        };
        self.notice = Some(match self.clipboard.set_text(&text) {
            Ok(()) => format!("Copied {} characters.", text.chars().count()),
            Err(e) => {
                warn!("copy failed: {e:#}");
                format!("Copy failed: {e:#}")
            }
        });
    }

    /// Stop revealing the outstanding answer, if any.  The full answer is
    /// still stored when it arrives.
    pub(crate) fn stop_reveal(&mut self) {
        if let Some(h) = self.in_flight.as_ref().and_then(|f| f.handle.as_ref()) {
            h.cancel();
        }
    }
}

pub(crate) fn prev_char_boundary(s: &str, pos: usize) -> usize {
    if pos == 0 {
        return 0;
    }
    let mut p = pos - 1;
    while p > 0 && !s.is_char_boundary(p) {
        p -= 1;
    }
    p
}

pub(crate) fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(pos)
}

pub(crate) fn prev_word_boundary(s: &str, pos: usize) -> usize {
    let bytes   = &s.as_bytes()[..pos];
    let trimmed = bytes.iter().rposition(|&b| b != b' ').map(|i| i + 1).unwrap_or(0);
    bytes[..trimmed].iter().rposition(|&b| b == b' ').map(|i| i + 1).unwrap_or(0)
}

pub(crate) fn next_word_boundary(s: &str, pos: usize) -> usize {
    let bytes = &s.as_bytes()[pos..];
    let start = bytes.iter().position(|&b| b != b' ').unwrap_or(bytes.len());
    let end   = bytes[start..].iter().position(|&b| b == b' ').unwrap_or(bytes.len() - start);
    pos + start + end
}
