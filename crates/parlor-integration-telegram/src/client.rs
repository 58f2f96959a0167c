//! Telegram Bot API client wrapper

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use tracing::{debug, error};

use parlor::{DomainError, Menu, Messenger, OutgoingMessage};

/// Messenger backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Render a menu as an inline keyboard; button data is the command text
pub(crate) fn keyboard(menu: &Menu) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(menu.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(&button.label, &button.command))
            .collect::<Vec<_>>()
    }))
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(
        &self,
        chat_id: i64,
        message: &OutgoingMessage,
    ) -> Result<i32, DomainError> {
        debug!(chat_id = %chat_id, content_len = %message.text.len(), "Sending message to Telegram");

        let mut request = self.bot.send_message(ChatId(chat_id), &message.text);
        if message.html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(menu) = &message.menu {
            request = request.reply_markup(keyboard(menu));
        }

        let sent = request
            .await
            .inspect_err(|e| error!(chat_id = %chat_id, error = %e, "Failed to send Telegram message"))
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        Ok(sent.id.0)
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), DomainError> {
        debug!(chat_id = %chat_id, message_id = %message_id, "Deleting Telegram message");

        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor::application::main_menu;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_main_menu_keyboard() {
        let markup = keyboard(&main_menu());

        assert_eq!(markup.inline_keyboard.len(), 5);
        assert!(markup.inline_keyboard.iter().all(|row| row.len() == 2));

        let first = &markup.inline_keyboard[0][0];
        assert_eq!(first.text, "New Character");
        match &first.kind {
            InlineKeyboardButtonKind::CallbackData(data) => assert_eq!(data, "/newchar"),
            other => panic!("unexpected button kind: {:?}", other),
        }
    }

    #[test]
    fn test_empty_menu() {
        let markup = keyboard(&Menu::default());
        assert!(markup.inline_keyboard.is_empty());
    }
}
