// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Conversation threads and the "current thread" pointer.
//!
//! The full thread list is written to storage as JSON after every mutation,
//! in the shape `[{"id": 1700000000000, "messages": [{"role": "ai", "text": "…"}]}]`.
//! Writes are best-effort: a failed write is logged and the in-memory state
//! stays authoritative.

use std::sync::Arc;

use chrono::Utc;
use gemchat_model::Message;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{KeyValueStorage, StorageError};

/// Creation time in milliseconds since the Unix epoch; unique per store.
pub type ThreadId = i64;

/// Opening message of the thread synthesized when nothing was stored.
pub const GREETING: &str = "Hello! I’m Gemini, your AI assistant. How can I help you today?";

const TITLE_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Thread {
    pub fn new(id: ThreadId) -> Self {
        Self { id, messages: Vec::new() }
    }

    /// Sidebar label: the first 20 characters of the opening message.
    pub fn title(&self) -> String {
        match self.messages.first() {
            Some(m) if !m.text.is_empty() => m.text.chars().take(TITLE_CHARS).collect(),
            _ => "New Chat".to_string(),
        }
    }
}

pub struct ConversationStore {
    threads: Vec<Thread>,
    current: Option<ThreadId>,
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl ConversationStore {
    /// Restore the thread list stored under `key`.
    ///
    /// When nothing usable is stored, a single thread holding the greeting is
    /// created.  The first thread becomes current.
    pub fn load(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        // Unreadable state is kept aside and never overwritten here; the
        // greeting thread is only written on the next real mutation.
        let (stored, write_greeting) = match storage.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Thread>>(&raw) {
                Ok(threads) => (threads, true),
                Err(e) => {
                    warn!(key = %key, "ignoring unreadable thread list: {e}");
                    keep_backup(storage.as_ref(), &key, &raw);
                    (Vec::new(), false)
                }
            },
            Ok(None) => (Vec::new(), true),
            Err(e) => {
                warn!(key = %key, "could not read thread list: {e}");
                (Vec::new(), false)
            }
        };

        let mut store = Self { threads: Vec::new(), current: None, storage, key };
        if stored.is_empty() {
            let mut first = Thread::new(Utc::now().timestamp_millis());
            first.messages.push(Message::ai(GREETING));
            store.current = Some(first.id);
            store.threads.push(first);
            if write_greeting {
                store.snapshot();
            }
        } else {
            debug!(threads = stored.len(), "restored threads");
            store.current = stored.first().map(|t| t.id);
            store.threads = stored;
        }
        store
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn current_id(&self) -> Option<ThreadId> {
        self.current
    }

    pub fn thread(&self, id: ThreadId) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == id)
    }

    pub fn current(&self) -> Option<&Thread> {
        self.current.and_then(|id| self.thread(id))
    }

    /// Messages of the current thread, or nothing when no thread is current.
    pub fn current_messages(&self) -> &[Message] {
        self.current().map(|t| t.messages.as_slice()).unwrap_or(&[])
    }

    /// Start an empty thread at the front of the list and make it current.
    pub fn create(&mut self) -> ThreadId {
        self.create_at(Utc::now().timestamp_millis())
    }

    /// As [`create`](Self::create) with an explicit clock reading.  Ids never
    /// repeat: a reading at or below an existing id is bumped past the largest.
    pub fn create_at(&mut self, now_ms: i64) -> ThreadId {
        let id = match self.threads.iter().map(|t| t.id).max() {
            Some(max) if now_ms <= max => max + 1,
            _ => now_ms,
        };
        self.threads.insert(0, Thread::new(id));
        self.current = Some(id);
        debug!(id, "created thread");
        self.snapshot();
        id
    }

    /// Make `id` current.  Unknown ids are ignored and reported as `false`.
    pub fn select(&mut self, id: ThreadId) -> bool {
        if self.thread(id).is_none() {
            debug!(id, "ignoring selection of unknown thread");
            return false;
        }
        self.current = Some(id);
        true
    }

    /// Remove a thread.  If it was current, the first remaining thread (or
    /// none) becomes current.
    pub fn delete(&mut self, id: ThreadId) -> bool {
        let before = self.threads.len();
        self.threads.retain(|t| t.id != id);
        if self.threads.len() == before {
            return false;
        }
        if self.current == Some(id) {
            self.current = self.threads.first().map(|t| t.id);
        }
        debug!(id, remaining = self.threads.len(), "deleted thread");
        self.snapshot();
        true
    }

    /// Append to the thread `id`, leaving every other thread untouched.
    ///
    /// The id is the one captured when the exchange started, not whatever is
    /// current now.  A thread deleted in the meantime drops the message.
    pub fn append(&mut self, id: ThreadId, message: Message) -> bool {
        let Some(thread) = self.threads.iter_mut().find(|t| t.id == id) else {
            warn!(id, role = %message.role, "dropping message for deleted thread");
            return false;
        };
        thread.messages.push(message);
        self.snapshot();
        true
    }

    /// Write the full thread list to storage.
    pub fn persist(&self) -> Result<(), StorageError> {
        // Serializing plain structs of strings and integers cannot fail.
        let json = serde_json::to_string(&self.threads).unwrap_or_else(|_| "[]".into());
        self.storage.set(&self.key, &json)
    }

    fn snapshot(&self) {
        if let Err(e) = self.persist() {
            warn!(key = %self.key, "could not save threads: {e}");
        }
    }
}

/// Copy an unreadable value to `<key>.bak` so a later write cannot lose it.
fn keep_backup(storage: &dyn KeyValueStorage, key: &str, raw: &str) {
    let backup = backup_key(key);
    match storage.set(&backup, raw) {
        Ok(()) => warn!(key, backup = %backup, "kept unreadable thread list"),
        Err(e) => warn!(key, backup = %backup, "could not keep unreadable thread list: {e}"),
    }
}

pub fn backup_key(key: &str) -> String {
    format!("{key}.bak")
}
