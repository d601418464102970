// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::provider::FetchError;

/// Deterministic offline provider.  Echoes the question back.
#[derive(Default)]
pub struct MockProvider;

#[async_trait]
impl crate::AnswerProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, question: &str) -> Result<Option<String>, FetchError> {
        Ok(Some(format!("MOCK: {question}")))
    }
}

/// One scripted outcome for [`ScriptedMockProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// The endpoint answered with this text.
    Answer(String),
    /// The endpoint answered without answer text.
    NoAnswer,
    /// The endpoint answered with a non-success status.
    Failure { status: u16 },
}

/// A pre-scripted provider.  Each call to `fetch` pops the next reply from
/// the front of the queue; an exhausted script behaves like [`MockReply::NoAnswer`].
pub struct ScriptedMockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Every question seen, in order.  Tests inspect this to check what was sent.
    pub questions: Arc<Mutex<Vec<String>>>,
}

impl ScriptedMockProvider {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Convenience: provider that answers a single question with `reply`.
    pub fn always_text(reply: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Answer(reply.into())])
    }

    /// Questions received so far.
    pub fn seen(&self) -> Vec<String> {
        self.questions.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl crate::AnswerProvider for ScriptedMockProvider {
    fn name(&self) -> &str {
        "scripted-mock"
    }

    async fn fetch(&self, question: &str) -> Result<Option<String>, FetchError> {
        if let Ok(mut q) = self.questions.lock() {
            q.push(question.to_string());
        }
        let next = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        match next {
            Some(MockReply::Answer(text)) => Ok(Some(text)),
            Some(MockReply::NoAnswer) | None => Ok(None),
            Some(MockReply::Failure { status }) => Err(FetchError::Status {
                status,
                body: "scripted failure".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerProvider, FETCH_ERROR_TEXT, NO_RESPONSE_TEXT};

    #[tokio::test]
    async fn mock_echoes_question() {
        assert_eq!(MockProvider.answer("ping").await, "MOCK: ping");
    }

    #[tokio::test]
    async fn scripted_replies_are_consumed_in_order() {
        let p = ScriptedMockProvider::new(vec![
            MockReply::Answer("one".into()),
            MockReply::Failure { status: 500 },
            MockReply::NoAnswer,
        ]);
        assert_eq!(p.answer("a").await, "one");
        assert_eq!(p.answer("b").await, FETCH_ERROR_TEXT);
        assert_eq!(p.answer("c").await, NO_RESPONSE_TEXT);
        assert_eq!(p.answer("d").await, NO_RESPONSE_TEXT, "exhausted script");
        assert_eq!(p.seen(), vec!["a", "b", "c", "d"]);
    }
}
