// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Serde default helper: returns `true`.
///
/// `#[serde(default)]` on a `bool` falls back to `false`, so fields that are
/// on unless switched off need a named function.
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

/// Where questions are sent.
///
/// The base URL and key are normally supplied through the environment
/// (`GEMINI_URL` / `GEMINI_API_KEY`); explicit values in a config file win.
/// Nothing is validated at startup: a missing URL or key makes requests
/// fail, and the failure is reported in the chat like any other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// "gemini" | "mock"
    pub provider: String,
    /// Full `generateContent` URL, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent`
    pub base_url: Option<String>,
    /// Environment variable holding the base URL (read at startup)
    pub base_url_env: Option<String>,
    /// Explicit API key; prefer api_key_env to keep secrets out of files
    pub api_key: Option<String>,
    /// Environment variable holding the API key (read at startup)
    pub api_key_env: Option<String>,
    /// Per-request timeout in seconds.  Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".into(),
            base_url: None,
            base_url_env: Some("GEMINI_URL".into()),
            api_key: None,
            api_key_env: Some("GEMINI_API_KEY".into()),
            timeout_secs: None,
        }
    }
}

/// Pacing of the simulated token-by-token display of an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Reveal answers incrementally.  When false the answer appears at once.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Pause between chunks in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_chunk_size() -> usize {
    3
}

fn default_delay_ms() -> u64 {
    30
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chunk_size: default_chunk_size(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Local persisted state: one file per key inside `dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory override.  Defaults to `$XDG_DATA_HOME/gemchat`.
    pub dir: Option<PathBuf>,
    /// Key under which the thread list is stored
    pub history_key: String,
    /// Key under which the theme name is stored
    pub theme_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            history_key: "geminiChats".into(),
            theme_key: "theme".into(),
        }
    }
}

impl StorageConfig {
    /// Directory holding the persisted keys (and the TUI log file).
    pub fn resolve_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".local")
                    .join("share")
            })
            .join("gemchat")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Theme used when none has been saved yet: "dark" | "light"
    pub theme: String,
    /// Use plain ASCII borders/indicators instead of Unicode box-drawing.
    /// Can also be forced with the GEMCHAT_ASCII_BORDERS=1 environment variable.
    pub ascii_borders: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".into(),
            ascii_borders: false,
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
