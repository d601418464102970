// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Paced display of an answer that has already arrived in full.
//!
//! The text is cut into fixed-size character chunks that are handed out one
//! at a time with a fixed pause in between.  A [`RevealHandle`] stops the
//! sequence early; after cancellation no further chunk is produced.

use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use gemchat_config::RevealConfig;
use tokio::sync::watch;

/// Revealed in place of an answer when the endpoint could not be reached.
pub const FALLBACK_REVEAL_TEXT: &str =
    "Sorry, I couldn't reach Gemini just now, so there is no answer to show. Please try again in a moment.";

/// Split `text` into consecutive runs of `chunk_size` characters (the last
/// run may be shorter).  A size of zero is treated as one.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut buf = String::new();
    let mut n = 0;
    for c in text.chars() {
        buf.push(c);
        n += 1;
        if n == size {
            chunks.push(std::mem::take(&mut buf));
            n = 0;
        }
    }
    if !buf.is_empty() {
        chunks.push(buf);
    }
    chunks
}

/// Stops a [`Reveal`].  Cheap to clone; every clone controls the same reveal.
#[derive(Debug, Clone)]
pub struct RevealHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl RevealHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

pub struct Reveal {
    chunks: std::vec::IntoIter<String>,
    delay: Duration,
    started: bool,
    // Holding a sender keeps `changed()` from failing if every handle is dropped.
    _tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Reveal {
    pub fn new(text: &str, chunk_size: usize, delay: Duration) -> (Self, RevealHandle) {
        let (tx, rx) = watch::channel(false);
        let tx = Arc::new(tx);
        let reveal = Self {
            chunks: chunk_text(text, chunk_size).into_iter(),
            delay,
            started: false,
            _tx: tx.clone(),
            rx,
        };
        (reveal, RevealHandle { tx })
    }

    pub fn from_config(text: &str, cfg: &RevealConfig) -> (Self, RevealHandle) {
        Self::new(text, cfg.chunk_size, Duration::from_millis(cfg.delay_ms))
    }

    /// Chunks not yet handed out.
    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }

    fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// The next chunk, after the pause.  `None` once exhausted or cancelled.
    pub async fn next_chunk(&mut self) -> Option<String> {
        if self.is_cancelled() || self.chunks.as_slice().is_empty() {
            return None;
        }
        if self.started && !self.pause().await {
            return None;
        }
        self.started = true;
        self.chunks.next()
    }

    /// Sleep for the configured delay.  Returns `false` if cancelled meanwhile.
    async fn pause(&mut self) -> bool {
        if self.delay.is_zero() {
            return !self.is_cancelled();
        }
        let sleep = tokio::time::sleep(self.delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return !self.is_cancelled(),
                changed = self.rx.changed() => {
                    if changed.is_err() {
                        (&mut sleep).await;
                        return !self.is_cancelled();
                    }
                    if self.is_cancelled() {
                        return false;
                    }
                }
            }
        }
    }

    /// Feed every chunk to `on_chunk` in order.  Returns how many were delivered.
    pub async fn run<F: FnMut(&str)>(mut self, mut on_chunk: F) -> usize {
        let mut delivered = 0;
        while let Some(chunk) = self.next_chunk().await {
            on_chunk(&chunk);
            delivered += 1;
        }
        delivered
    }

    pub fn into_stream(self) -> impl Stream<Item = String> {
        futures::stream::unfold(self, |mut reveal| async move {
            let chunk = reveal.next_chunk().await?;
            Some((chunk, reveal))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn no_delay(text: &str, size: usize) -> (Reveal, RevealHandle) {
        Reveal::new(text, size, Duration::ZERO)
    }

    #[test]
    fn chunk_count_is_ceiling_of_length_over_size() {
        for (text, size) in [("", 3), ("a", 3), ("abc", 3), ("abcd", 3), ("abcdefg", 1), ("hello world", 4)] {
            let chunks = chunk_text(text, size);
            let len = text.chars().count();
            assert_eq!(chunks.len(), len.div_ceil(size), "{text:?}/{size}");
            assert_eq!(chunks.concat(), text);
        }
    }

    #[test]
    fn chunks_split_on_characters_not_bytes() {
        let chunks = chunk_text("héllo wörld 💭", 3);
        assert_eq!(chunks, vec!["hél", "lo ", "wör", "ld ", "💭"]);
    }

    #[test]
    fn zero_chunk_size_acts_as_one() {
        assert_eq!(chunk_text("abc", 0), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn run_delivers_every_chunk_in_order() {
        let (reveal, _h) = no_delay("Hello there, friend", 4);
        let mut seen = Vec::new();
        let n = reveal.run(|c| seen.push(c.to_string())).await;
        assert_eq!(n, 5);
        assert_eq!(seen.len(), 5);
        assert_eq!(seen.concat(), "Hello there, friend");
    }

    #[tokio::test]
    async fn empty_text_delivers_nothing() {
        let (reveal, _h) = no_delay("", 3);
        assert_eq!(reveal.run(|_| panic!("no chunks expected")).await, 0);
    }

    #[tokio::test]
    async fn stream_yields_same_chunks() {
        let (reveal, _h) = no_delay("abcdefgh", 3);
        let chunks: Vec<String> = reveal.into_stream().collect().await;
        assert_eq!(chunks, vec!["abc", "def", "gh"]);
    }

    #[tokio::test]
    async fn cancel_before_start_yields_nothing() {
        let (mut reveal, handle) = no_delay("abcdef", 2);
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(reveal.next_chunk().await.is_none());
    }

    #[tokio::test]
    async fn cancel_mid_reveal_stops_further_chunks() {
        let (mut reveal, handle) = Reveal::new("abcdef", 2, Duration::from_millis(5));
        assert_eq!(reveal.next_chunk().await.as_deref(), Some("ab"));
        handle.cancel();
        assert!(reveal.next_chunk().await.is_none());
        assert_eq!(reveal.remaining(), 2);
    }

    #[tokio::test]
    async fn cancel_during_pause_wakes_the_reveal() {
        let (mut reveal, handle) = Reveal::new("abcd", 2, Duration::from_secs(60));
        assert_eq!(reveal.next_chunk().await.as_deref(), Some("ab"));
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });
        let next = tokio::time::timeout(Duration::from_secs(5), reveal.next_chunk())
            .await
            .expect("cancel must interrupt the pause");
        assert!(next.is_none());
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn dropping_the_handle_does_not_cancel() {
        let (reveal, handle) = Reveal::new("abcdef", 2, Duration::from_millis(1));
        drop(handle);
        let chunks: Vec<String> = reveal.into_stream().collect().await;
        assert_eq!(chunks.concat(), "abcdef");
    }

    #[tokio::test]
    async fn pauses_between_chunks() {
        let (reveal, _h) = Reveal::new("abcdef", 2, Duration::from_millis(20));
        let start = tokio::time::Instant::now();
        reveal.run(|_| {}).await;
        // Three chunks, two pauses.
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
