//! Telegram configuration

use teloxide::Bot;

/// Configuration for Telegram integration
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub token: String,
    /// Log every incoming update
    pub debug: bool,
}

impl TelegramConfig {
    /// Create a new Telegram configuration with just a token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Bot API client for this token
    pub fn bot(&self) -> Bot {
        Bot::new(&self.token)
    }
}
