//! Theme preference: an explicit value plus an update callback, passed to
//! whoever renders.  Nothing global.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::storage::KeyValueStorage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme {0:?} (expected \"dark\" or \"light\")")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

type OnChange = Box<dyn FnMut(Theme) + Send>;

pub struct ThemePreference {
    theme: Theme,
    on_change: OnChange,
}

impl ThemePreference {
    pub fn new(theme: Theme, on_change: impl FnMut(Theme) + Send + 'static) -> Self {
        Self { theme, on_change: Box::new(on_change) }
    }

    /// Read the saved theme from `key` (falling back to `fallback`) and save
    /// every later change back under the same key.
    pub fn load(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>, fallback: Theme) -> Self {
        let key = key.into();
        let theme = match storage.get(&key) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(key = %key, "ignoring saved theme: {e}");
                fallback
            }),
            Ok(None) => fallback,
            Err(e) => {
                warn!(key = %key, "could not read theme: {e}");
                fallback
            }
        };
        Self::new(theme, move |t: Theme| {
            if let Err(e) = storage.set(&key, t.as_str()) {
                warn!(key = %key, "could not save theme: {e}");
            }
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        (self.on_change)(theme);
    }

    /// Switch dark ↔ light and return the new theme.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled());
        self.theme
    }
}
