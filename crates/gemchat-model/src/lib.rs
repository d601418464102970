// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod types;
mod provider;
mod google;
mod mock;

pub use types::*;
pub use provider::{collapse_outcome, AnswerProvider, FetchError, FETCH_ERROR_TEXT, NO_RESPONSE_TEXT};
pub use google::{extract_answer, request_body, GeminiProvider};
pub use mock::{MockProvider, MockReply, ScriptedMockProvider};

use std::time::Duration;

use anyhow::bail;
use gemchat_config::EndpointConfig;

/// Construct a boxed [`AnswerProvider`] from configuration.
///
/// Provider selection:
/// - `"gemini"` → [`GeminiProvider`]
/// - `"mock"` → [`MockProvider`] (echo-back)
pub fn from_config(cfg: &EndpointConfig) -> anyhow::Result<Box<dyn AnswerProvider>> {
    match cfg.provider.as_str() {
        "gemini" => Ok(Box::new(GeminiProvider::new(
            resolve_base_url(cfg),
            resolve_api_key(cfg),
            cfg.timeout_secs.map(Duration::from_secs),
        ))),
        "mock" => Ok(Box::new(MockProvider)),
        other => bail!("unknown answer provider: {other}"),
    }
}

fn resolve_base_url(cfg: &EndpointConfig) -> Option<String> {
    if let Some(u) = &cfg.base_url {
        return Some(u.clone());
    }
    cfg.base_url_env.as_ref().and_then(|env| std::env::var(env).ok())
}

fn resolve_api_key(cfg: &EndpointConfig) -> Option<String> {
    if let Some(k) = &cfg.api_key {
        return Some(k.clone());
    }
    cfg.api_key_env.as_ref().and_then(|env| std::env::var(env).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win_over_environment() {
        let cfg = EndpointConfig {
            base_url: Some("http://example.invalid/gen".into()),
            base_url_env: Some("GEMCHAT_TEST_UNSET_URL_VAR".into()),
            api_key: Some("k".into()),
            ..EndpointConfig::default()
        };
        assert_eq!(resolve_base_url(&cfg).as_deref(), Some("http://example.invalid/gen"));
        assert_eq!(resolve_api_key(&cfg).as_deref(), Some("k"));
    }

    #[test]
    fn unset_environment_resolves_to_none() {
        let cfg = EndpointConfig {
            base_url_env: Some("GEMCHAT_TEST_UNSET_URL_VAR".into()),
            api_key_env: Some("GEMCHAT_TEST_UNSET_KEY_VAR".into()),
            ..EndpointConfig::default()
        };
        assert!(resolve_base_url(&cfg).is_none());
        assert!(resolve_api_key(&cfg).is_none());
    }

    #[test]
    fn known_providers_instantiate() {
        for provider in ["gemini", "mock"] {
            let cfg = EndpointConfig { provider: provider.into(), ..EndpointConfig::default() };
            let p = from_config(&cfg).unwrap();
            assert_eq!(p.name(), provider);
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let cfg = EndpointConfig { provider: "nope".into(), ..EndpointConfig::default() };
        let err = from_config(&cfg).err().unwrap();
        assert!(err.to_string().contains("unknown answer provider"));
    }
}
