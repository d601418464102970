// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod app;
mod clipboard;
mod keys;
mod layout;
pub mod markdown;
mod widgets;
mod wrap;

pub use app::{App, AppOptions};
pub use clipboard::{ClipboardSink, SystemClipboard};
pub use markdown::{tokenize, tokenize_line, SpanKind, TextSpan};
