//! Google Gemini driver: single-shot `generateContent` call.
//!
//! # Auth
//! API key via the `?key=...` query parameter.
//!
//! # Endpoint pattern
//! `POST {base_url}?key={api_key}` where `base_url` is the full model URL,
//! e.g. `https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::provider::FetchError;

pub struct GeminiProvider {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(base_url: Option<String>, api_key: Option<String>, timeout: Option<Duration>) -> Self {
        Self {
            base_url,
            api_key,
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl crate::AnswerProvider for GeminiProvider {
    fn name(&self) -> &str { "gemini" }

    async fn fetch(&self, question: &str) -> Result<Option<String>, FetchError> {
        let url = self.base_url.as_deref().ok_or(FetchError::MissingBaseUrl)?;

        let mut req = self.client.post(url).json(&request_body(question));
        // Without a key the query parameter is left out; the endpoint rejects the request.
        if let Some(key) = &self.api_key {
            req = req.query(&[("key", key)]);
        }
        if let Some(t) = self.timeout {
            req = req.timeout(t);
        }

        debug!(question_len = question.len(), "sending Gemini request");

        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let text = resp.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        Ok(extract_answer(&body))
    }
}

/// `{ "contents": [{ "parts": [{ "text": question }] }] }`
pub fn request_body(question: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": question }] }]
    })
}

/// Read `candidates[0].content.parts[0].text`.  Anything else (missing path,
/// non-string, empty string) yields `None`.
pub fn extract_answer(body: &Value) -> Option<String> {
    body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnswerProvider;

    #[test]
    fn provider_name() {
        let p = GeminiProvider::new(None, None, None);
        assert_eq!(p.name(), "gemini");
    }

    #[test]
    fn request_body_wraps_question() {
        let body = request_body("Hi");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hi");
        assert_eq!(body["contents"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn answer_text_extracted() {
        let v = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "hello" }] }
            }]
        });
        assert_eq!(extract_answer(&v).as_deref(), Some("hello"));
    }

    #[test]
    fn only_first_candidate_and_part_are_read() {
        let v = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }, { "text": "second" }] } },
                { "content": { "parts": [{ "text": "other" }] } }
            ]
        });
        assert_eq!(extract_answer(&v).as_deref(), Some("first"));
    }

    #[test]
    fn missing_path_yields_none() {
        assert!(extract_answer(&json!({})).is_none());
        assert!(extract_answer(&json!({ "candidates": [] })).is_none());
        assert!(extract_answer(&json!({ "candidates": [{ "finishReason": "SAFETY" }] })).is_none());
    }

    #[test]
    fn empty_or_non_string_text_yields_none() {
        let empty = json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] });
        let number = json!({ "candidates": [{ "content": { "parts": [{ "text": 42 }] } }] });
        assert!(extract_answer(&empty).is_none());
        assert!(extract_answer(&number).is_none());
    }

    #[tokio::test]
    async fn missing_base_url_is_an_error_not_a_panic() {
        let p = GeminiProvider::new(None, Some("k".into()), None);
        assert!(matches!(p.fetch("q").await, Err(FetchError::MissingBaseUrl)));
        assert_eq!(p.answer("q").await, crate::FETCH_ERROR_TEXT);
    }
}
