// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Applying background answer progress to the app.

use gemchat_core::AnswerEvent;
use tracing::debug;

use crate::app::App;

impl App {
    pub(crate) fn handle_answer_event(&mut self, event: AnswerEvent) {
        match event {
            AnswerEvent::Started { thread_id, handle } => {
                match self.in_flight.as_mut() {
                    Some(f) if f.thread_id == thread_id => {
                        if self.session.store().thread(thread_id).is_none() {
                            handle.cancel();
                        }
                        f.handle = Some(handle);
                    }
                    _ => handle.cancel(),
                }
            }
            AnswerEvent::Chunk { thread_id, text } => {
                if let Some(f) = self.in_flight.as_mut() {
                    if f.thread_id == thread_id {
                        f.revealed.push_str(&text);
                        self.rerender_chat();
                    }
                }
            }
            AnswerEvent::Done { thread_id, text } => {
                let stored = self.session.finish_send(thread_id, text);
                debug!(thread_id, stored, "answer finished");
                if self.in_flight.as_ref().is_some_and(|f| f.thread_id == thread_id) {
                    self.in_flight = None;
                }
                self.rerender_chat();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::testing::app_with;
    use crate::keys::Action;
    use gemchat_core::FALLBACK_REVEAL_TEXT;
    use gemchat_model::{Message, MockReply};

    #[tokio::test]
    async fn pending_bubble_shows_thinking_then_partial_answer() {
        let (mut app, _) = app_with(vec![MockReply::Answer("abcdefg".into())]);
        app.inject_input("Hi");
        app.dispatch(Action::Submit);
        assert!(app.chat_text().iter().any(|l| l.contains("thinking")));

        assert!(app.step().await, "started");
        assert!(app.in_flight.as_ref().unwrap().handle.is_some());
        assert!(app.step().await, "first chunk");
        assert_eq!(app.in_flight.as_ref().unwrap().revealed, "abc");
        assert!(app.chat_text().iter().any(|l| l.trim() == "abc"));
        assert!(!app.chat_text().iter().any(|l| l.contains("thinking")));

        app.settle().await;
        assert_eq!(
            app.session.store().current_messages().last(),
            Some(&Message::ai("abcdefg"))
        );
        assert!(app.chat_text().iter().any(|l| l.trim() == "abcdefg"));
    }

    #[tokio::test]
    async fn pending_bubble_only_in_target_thread() {
        let (mut app, _) = app_with(vec![MockReply::Answer("abcdefg".into())]);
        app.inject_input("Hi");
        app.dispatch(Action::Submit);
        app.dispatch(Action::NewThread);
        assert!(!app.chat_text().iter().any(|l| l.contains("thinking")));
        assert!(app.is_loading(), "still loading in another thread");
        app.settle().await;
    }

    #[tokio::test]
    async fn stopping_the_reveal_still_stores_full_answer() {
        let (mut app, _) = app_with(vec![MockReply::Answer("abcdefghijkl".into())]);
        app.inject_input("Hi");
        app.dispatch(Action::Submit);
        assert!(app.step().await, "started");
        app.dispatch(Action::StopReveal);
        app.settle().await;
        assert_eq!(
            app.session.store().current_messages().last(),
            Some(&Message::ai("abcdefghijkl"))
        );
    }

    #[tokio::test]
    async fn failed_fetch_reveals_fallback() {
        let (mut app, _) = app_with(vec![MockReply::Failure { status: 500 }]);
        app.inject_input("Hi");
        app.dispatch(Action::Submit);
        app.settle().await;
        assert_eq!(
            app.session.store().current_messages().last(),
            Some(&Message::ai(FALLBACK_REVEAL_TEXT))
        );
    }
}
