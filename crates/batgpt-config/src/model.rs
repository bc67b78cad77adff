//! Configuration layout for BatGPT.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Root config for the BatGPT shell.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BatgptConfig {
    /// Mock reply timing.
    #[serde(default)]
    pub reply: ReplyConfig,
    /// Saved conversation behaviour.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Terminal shell settings.
    #[serde(default)]
    pub ui: UiConfig,
}

impl BatgptConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> BatgptConfigBuilder {
        BatgptConfigBuilder::new()
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.default_title.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                path: "history.default_title".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.ui.tick_ms == 0 {
            return Err(ConfigError::InvalidField {
                path: "ui.tick_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for assembling a `BatgptConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct BatgptConfigBuilder {
    config: BatgptConfig,
}

impl BatgptConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: BatgptConfig::default(),
        }
    }

    /// Replace the reply timing configuration.
    pub fn reply(mut self, reply: ReplyConfig) -> Self {
        self.config.reply = reply;
        self
    }

    /// Replace the history configuration.
    pub fn history(mut self, history: HistoryConfig) -> Self {
        self.config.history = history;
        self
    }

    /// Replace the shell configuration.
    pub fn ui(mut self, ui: UiConfig) -> Self {
        self.config.ui = ui;
        self
    }

    /// Finalize and return the built `BatgptConfig`.
    pub fn build(self) -> BatgptConfig {
        self.config
    }
}

/// Timing of the deferred assistant reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReplyConfig {
    /// Delay between a user message and the mock reply, in milliseconds.
    #[serde(default = "default_reply_delay_ms")]
    pub delay_ms: u64,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_reply_delay_ms(),
        }
    }
}

fn default_reply_delay_ms() -> u64 {
    650
}

/// Conversation history behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Start with the two example scenes in history.
    #[serde(default = "default_true")]
    pub seed_examples: bool,
    /// Title used when saving without an explicit one.
    #[serde(default = "default_title")]
    pub default_title: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            seed_examples: true,
            default_title: default_title(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_title() -> String {
    "Saved Scene".to_string()
}

/// Terminal shell settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// How long a status notice stays visible, in milliseconds.
    #[serde(default = "default_notice_ms")]
    pub notice_ms: u64,
    /// Tick interval used to expire notices, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Display name shown in the header; falls back to `$USER`.
    #[serde(default)]
    pub user_name: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_ms: default_notice_ms(),
            tick_ms: default_tick_ms(),
            user_name: None,
        }
    }
}

fn default_notice_ms() -> u64 {
    2500
}

fn default_tick_ms() -> u64 {
    250
}
