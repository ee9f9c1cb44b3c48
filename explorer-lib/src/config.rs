//! Explorer configuration

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::query::TextMatch;

/// Default debounce window for free-text input, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Configuration for an explorer instance.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use explorer_lib::config::ExplorerConfig;
/// use explorer_lib::query::TextMatch;
///
/// let config = ExplorerConfig::default()
///     .with_debounce(Duration::from_millis(150))
///     .with_text_match(TextMatch::Fuzzy);
/// assert_eq!(config.toolbar.debounce(), Duration::from_millis(150));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Toolbar behaviour.
    pub toolbar: ToolbarConfig,
}

impl ExplorerConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text debounce window.
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.toolbar = self.toolbar.with_debounce(window);
        self
    }

    /// Sets how the free-text query is matched.
    pub fn with_text_match(mut self, mode: TextMatch) -> Self {
        self.toolbar.text_match = mode;
        self
    }

    /// Parses a config from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Configuration for the toolbar controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    /// Debounce window for free-text input, in milliseconds.
    ///
    /// Keystrokes are committed to the view once no further input arrived for
    /// this long. Zero commits every keystroke immediately.
    ///
    /// Default: 300 ms
    pub debounce_ms: u64,

    /// How the free-text query is matched.
    ///
    /// Default: substring
    pub text_match: TextMatch,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            text_match: TextMatch::default(),
        }
    }
}

impl ToolbarConfig {
    /// Creates a config that commits text input immediately.
    pub fn immediate() -> Self {
        Self {
            debounce_ms: 0,
            ..Default::default()
        }
    }

    /// Returns the debounce window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Sets the debounce window.
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce_ms = window.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }
}
