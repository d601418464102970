// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The send flow: optimistic user append, fetch, paced reveal, answer append.
//!
//! The target thread is captured when the question is sent.  Switching or
//! creating threads while an answer is outstanding never redirects it; a
//! thread deleted in the meantime simply loses the answer.

use std::sync::Arc;

use gemchat_config::RevealConfig;
use gemchat_model::{collapse_outcome, AnswerProvider, FetchError, Message};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::reveal::{Reveal, RevealHandle, FALLBACK_REVEAL_TEXT};
use crate::store::{ConversationStore, ThreadId};

/// A question that has been appended to its thread and awaits an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub thread_id: ThreadId,
    pub question: String,
}

/// Progress of a background answer, sent from [`answer_task`] to the UI.
#[derive(Debug)]
pub enum AnswerEvent {
    /// Reveal is about to start; the handle stops it early.
    Started { thread_id: ThreadId, handle: RevealHandle },
    /// One more piece of the answer to display.
    Chunk { thread_id: ThreadId, text: String },
    /// The full answer, to be appended to `thread_id`.
    Done { thread_id: ThreadId, text: String },
}

/// Text that ends up in the thread for one fetch outcome.
///
/// With reveal enabled a failed fetch is replaced by a fixed apology rather
/// than the bare error string.
pub fn displayed_answer(
    provider: &str,
    outcome: Result<Option<String>, FetchError>,
    reveal_enabled: bool,
) -> String {
    match outcome {
        Err(e) if reveal_enabled => {
            warn!(provider, "answer unavailable, revealing fallback: {e}");
            FALLBACK_REVEAL_TEXT.to_string()
        }
        other => collapse_outcome(provider, other),
    }
}

pub struct ChatSession {
    store: ConversationStore,
    provider: Arc<dyn AnswerProvider>,
    reveal: RevealConfig,
}

impl ChatSession {
    pub fn new(store: ConversationStore, provider: Arc<dyn AnswerProvider>, reveal: RevealConfig) -> Self {
        Self { store, provider, reveal }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConversationStore {
        &mut self.store
    }

    pub fn provider(&self) -> Arc<dyn AnswerProvider> {
        Arc::clone(&self.provider)
    }

    pub fn reveal_config(&self) -> &RevealConfig {
        &self.reveal
    }

    pub fn set_reveal_enabled(&mut self, enabled: bool) {
        self.reveal.enabled = enabled;
    }

    /// Append the user's question to the current thread.
    ///
    /// Blank input, or no current thread, is rejected with `None` and
    /// nothing changes.  The question is stored as typed, untrimmed.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingSend> {
        if input.trim().is_empty() {
            return None;
        }
        let thread_id = self.store.current_id()?;
        self.store.append(thread_id, Message::user(input));
        debug!(thread_id, len = input.len(), "question sent");
        Some(PendingSend { thread_id, question: input.to_string() })
    }

    /// Append the answer to the thread captured when the question was sent.
    pub fn finish_send(&mut self, thread_id: ThreadId, answer: impl Into<String>) -> bool {
        self.store.append(thread_id, Message::ai(answer))
    }

    /// Run one full exchange in the caller's task.
    ///
    /// Each revealed chunk (or the whole answer, when reveal is off) is passed
    /// to `on_chunk`.  Returns the stored answer, or `None` if the input was
    /// rejected.
    pub async fn send(&mut self, input: &str, mut on_chunk: impl FnMut(&str)) -> Option<String> {
        let pending = self.begin_send(input)?;
        let outcome = self.provider.fetch(&pending.question).await;
        let text = displayed_answer(self.provider.name(), outcome, self.reveal.enabled);
        if self.reveal.enabled {
            let (reveal, _handle) = Reveal::from_config(&text, &self.reveal);
            reveal.run(&mut on_chunk).await;
        } else {
            on_chunk(&text);
        }
        self.finish_send(pending.thread_id, text.clone());
        Some(text)
    }
}

/// Fetch and reveal one answer in the background, reporting over `tx`.
///
/// Stops early if the receiver goes away.  A cancelled reveal still ends with
/// [`AnswerEvent::Done`] carrying the full text.
pub async fn answer_task(
    provider: Arc<dyn AnswerProvider>,
    pending: PendingSend,
    reveal: RevealConfig,
    tx: mpsc::Sender<AnswerEvent>,
) {
    let thread_id = pending.thread_id;
    let outcome = provider.fetch(&pending.question).await;
    let text = displayed_answer(provider.name(), outcome, reveal.enabled);

    if reveal.enabled {
        let (mut chunks, handle) = Reveal::from_config(&text, &reveal);
        if tx.send(AnswerEvent::Started { thread_id, handle }).await.is_err() {
            return;
        }
        while let Some(chunk) = chunks.next_chunk().await {
            if tx.send(AnswerEvent::Chunk { thread_id, text: chunk }).await.is_err() {
                return;
            }
        }
    }

    debug!(thread_id, len = text.len(), "answer complete");
    let _ = tx.send(AnswerEvent::Done { thread_id, text }).await;
}
