//! Telegram Integration for Parlor
//!
//! Long-polls the Telegram Bot API and feeds messages and inline-button
//! presses into a [`parlor::ChatController`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use parlor_integration_telegram::{run_polling, TelegramConfig, TelegramMessenger};
//!
//! let config = TelegramConfig::new("your-bot-token");
//! let bot = config.bot();
//! let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
//! run_polling(bot, config, controller).await;
//! ```

mod client;
mod config;
mod dispatcher;

pub use client::TelegramMessenger;
pub use config::TelegramConfig;
pub use dispatcher::run_polling;
