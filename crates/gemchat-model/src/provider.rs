use async_trait::async_trait;
use thiserror::Error;
use tracing::error;

/// Shown when the endpoint answered but carried no answer text.
pub const NO_RESPONSE_TEXT: &str = "No response";

/// Shown when the endpoint could not be reached or answered with an error.
pub const FETCH_ERROR_TEXT: &str = "Error contacting Gemini API.";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no endpoint URL configured")]
    MissingBaseUrl,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Provider name for logs and status display.
    fn name(&self) -> &str;

    /// Ask one question.
    ///
    /// `Ok(None)` means the endpoint answered successfully but the answer
    /// text was missing or empty.
    async fn fetch(&self, question: &str) -> Result<Option<String>, FetchError>;

    /// Ask one question and always come back with something to display.
    async fn answer(&self, question: &str) -> String {
        collapse_outcome(self.name(), self.fetch(question).await)
    }
}

/// Map a fetch outcome to the text shown to the user.  Errors are logged here
/// and go no further.
pub fn collapse_outcome(provider: &str, outcome: Result<Option<String>, FetchError>) -> String {
    match outcome {
        Ok(Some(text)) => text,
        Ok(None) => NO_RESPONSE_TEXT.to_string(),
        Err(e) => {
            error!(provider, "error asking for an answer: {e}");
            FETCH_ERROR_TEXT.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_text_passes_through() {
        assert_eq!(collapse_outcome("t", Ok(Some("Hello".into()))), "Hello");
    }

    #[test]
    fn missing_answer_becomes_no_response() {
        assert_eq!(collapse_outcome("t", Ok(None)), NO_RESPONSE_TEXT);
    }

    #[test]
    fn errors_become_fixed_error_text() {
        let err = FetchError::Status { status: 500, body: "boom".into() };
        assert_eq!(collapse_outcome("t", Err(err)), FETCH_ERROR_TEXT);
        assert_eq!(collapse_outcome("t", Err(FetchError::MissingBaseUrl)), FETCH_ERROR_TEXT);
    }

    #[test]
    fn status_error_mentions_code_and_body() {
        let err = FetchError::Status { status: 403, body: "denied".into() };
        assert_eq!(err.to_string(), "endpoint returned 403: denied");
    }
}
