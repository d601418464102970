// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
pub mod reveal;
pub mod session;
pub mod storage;
pub mod store;
pub mod theme;

pub use reveal::{chunk_text, Reveal, RevealHandle, FALLBACK_REVEAL_TEXT};
pub use session::{answer_task, displayed_answer, AnswerEvent, ChatSession, PendingSend};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{backup_key, ConversationStore, Thread, ThreadId, GREETING};
pub use theme::{ParseThemeError, Theme, ThemePreference};
