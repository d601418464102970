// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Top-level TUI application state and event loop.

pub(crate) mod answer_events;
pub(crate) mod chat_ops;
pub(crate) mod dispatch;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use gemchat_core::{AnswerEvent, ChatSession, RevealHandle, ThemePreference, ThreadId};
use ratatui::layout::Rect;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    clipboard::{ClipboardSink, SystemClipboard},
    keys::map_key,
    layout::AppLayout,
    markdown::StyledLines,
    widgets::{
        draw_background, draw_chat, draw_disclaimer, draw_header, draw_help, draw_input,
        draw_notice, draw_sidebar, Palette,
    },
    wrap::{wrap_content, WrapState},
};

// ── Public types ──────────────────────────────────────────────────────────────

/// Options passed when constructing the TUI app.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Sent as the first question once the UI is up.
    pub initial_prompt: Option<String>,
    /// Use plain ASCII borders and indicators.
    pub ascii: bool,
}

/// The answer currently being fetched or revealed.
#[derive(Debug)]
pub(crate) struct InFlight {
    pub thread_id: ThreadId,
    pub revealed: String,
    pub handle: Option<RevealHandle>,
}

pub struct App {
    pub(crate) session: ChatSession,
    pub(crate) theme: ThemePreference,
    pub(crate) ascii: bool,
    initial_prompt: Option<String>,

    // Input box
    pub(crate) input_buffer: String,
    pub(crate) input_cursor: usize,
    pub(crate) input_scroll_offset: usize,
    pub(crate) last_input_inner_width: usize,
    pub(crate) last_input_inner_height: usize,

    // Chat pane
    pub(crate) chat_lines: StyledLines,
    pub(crate) chat_width: usize,
    pub(crate) chat_height: u16,
    pub(crate) scroll_offset: u16,
    pub(crate) auto_scroll: bool,

    pub(crate) sidebar_visible: bool,
    pub(crate) show_help: bool,
    pub(crate) notice: Option<String>,
    pub(crate) clipboard: Box<dyn ClipboardSink>,

    pub(crate) in_flight: Option<InFlight>,
    pub(crate) event_tx: mpsc::Sender<AnswerEvent>,
    event_rx: mpsc::Receiver<AnswerEvent>,
}

impl App {
    pub fn new(session: ChatSession, theme: ThemePreference, opts: AppOptions) -> Self {
        let (event_tx, event_rx) = mpsc::channel::<AnswerEvent>(256);
        let mut app = Self {
            session,
            theme,
            ascii: opts.ascii,
            initial_prompt: opts.initial_prompt,
            input_buffer: String::new(),
            input_cursor: 0,
            input_scroll_offset: 0,
            last_input_inner_width: 0,
            last_input_inner_height: 0,
            chat_lines: Vec::new(),
            chat_width: 0,
            chat_height: 1,
            scroll_offset: 0,
            auto_scroll: true,
            sidebar_visible: true,
            show_help: false,
            notice: None,
            clipboard: Box::new(SystemClipboard::default()),
            in_flight: None,
            event_tx,
            event_rx,
        };
        app.rerender_chat();
        app
    }

    /// Send copied text somewhere other than the system clipboard.
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// An answer is outstanding; the input box is disabled.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub(crate) fn palette(&self) -> Palette {
        Palette::for_theme(self.theme.theme())
    }

    /// Run the TUI event loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> anyhow::Result<()> {
        let mut crossterm_events = EventStream::new();

        if let Some(prompt) = self.initial_prompt.take() {
            self.input_buffer = prompt;
            self.input_cursor = self.input_buffer.len();
            self.submit();
        }

        loop {
            if let Ok(size) = terminal.size() {
                let layout = AppLayout::compute(
                    Rect::new(0, 0, size.width, size.height),
                    self.sidebar_visible,
                );
                self.apply_layout(&layout);
            }
            self.adjust_input_scroll();

            let wrapped = wrap_content(
                &self.input_buffer,
                self.last_input_inner_width,
                self.input_cursor,
            );
            terminal.draw(|frame| self.draw(frame, &wrapped))?;

            tokio::select! {
                Some(event) = self.event_rx.recv() => {
                    self.handle_answer_event(event);
                }
                Some(Ok(term_event)) = crossterm_events.next() => {
                    if self.handle_term_event(term_event) { break; }
                }
            }
        }

        self.stop_reveal();
        debug!("tui exiting");
        Ok(())
    }

    /// Handle one terminal event.  Returns `true` when the app should exit.
    pub(crate) fn handle_term_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                if self.show_help {
                    self.show_help = false;
                    return false;
                }
                self.notice = None;
                match map_key(k, self.is_loading()) {
                    Some(action) => self.dispatch(action),
                    None => false,
                }
            }
            Event::Paste(text) if !self.is_loading() => {
                self.input_buffer.insert_str(self.input_cursor, &text);
                self.input_cursor += text.len();
                false
            }
            _ => false,
        }
    }

    fn draw(&self, frame: &mut Frame, wrapped: &WrapState) {
        let palette = self.palette();
        let ascii = self.ascii;
        let layout = AppLayout::new(frame, self.sidebar_visible);
        let store = self.session.store();

        draw_background(frame, &palette);
        draw_sidebar(frame, layout.sidebar, store.threads(), store.current_id(), &palette, ascii);
        draw_header(
            frame,
            layout.header,
            self.theme.theme(),
            self.is_loading(),
            self.session.provider().name(),
            &palette,
            ascii,
        );
        draw_chat(frame, layout.chat_pane, &self.chat_lines, self.scroll_offset, &palette, ascii);
        draw_input(
            frame,
            layout.input_pane,
            wrapped,
            self.input_scroll_offset,
            self.is_loading(),
            &palette,
            ascii,
        );
        draw_disclaimer(frame, layout.disclaimer, &palette);
        if let Some(notice) = &self.notice {
            draw_notice(frame, layout.chat_pane, notice, &palette);
        }
        if self.show_help {
            draw_help(frame, &palette, ascii);
        }
    }

    /// Track pane sizes; re-wrap the conversation when the width changes.
    fn apply_layout(&mut self, layout: &AppLayout) {
        self.chat_height = layout.chat_inner_height().max(1);
        self.last_input_inner_width = layout.input_pane.width.saturating_sub(2) as usize;
        self.last_input_inner_height = layout.input_pane.height.saturating_sub(2) as usize;
        let width = layout.chat_inner_width() as usize;
        if width != self.chat_width {
            self.chat_width = width;
            self.rerender_chat();
        }
    }
}

// ── Test helpers ──────────────────────────────────────────────────────────────
