// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! System clipboard access.

use anyhow::Context;

/// Somewhere copied text can go.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// The desktop clipboard.  Opened on first use; terminals without a
/// display report an error then instead of at startup.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().context("clipboard not available")?);
        }
        match self.inner.as_mut() {
            Some(cb) => cb.set_text(text).context("clipboard error"),
            None => anyhow::bail!("clipboard not available"),
        }
    }
}
