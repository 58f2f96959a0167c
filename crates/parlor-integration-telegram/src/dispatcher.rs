//! Update dispatching
//!
//! Converts Telegram updates into controller events. teloxide runs
//! updates from different chats concurrently and updates from the same
//! chat one after another.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{BotCommand as TelegramCommand, CallbackQuery, Message, User};
use tracing::{debug, info, warn};

use parlor::{
    BotCommand, ChatController, ConversationUseCase, IncomingCallback, IncomingMessage, Messenger,
};

use crate::config::TelegramConfig;

fn user_fields(user: &User) -> (i64, Option<String>) {
    (user.id.0 as i64, user.username.clone())
}

/// Text message from a user; other updates (media, service messages) are ignored
pub(crate) fn incoming_message(msg: &Message) -> Option<IncomingMessage> {
    let text = msg.text()?;
    let (user_id, user_name) = user_fields(msg.from.as_ref()?);

    Some(IncomingMessage {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        user_id,
        user_name,
        text: text.to_string(),
    })
}

/// Button press on a message the bot can still reach
pub(crate) fn incoming_callback(query: &CallbackQuery) -> Option<IncomingCallback> {
    let data = query.data.clone()?;
    let message = query.message.as_ref()?;
    let (user_id, user_name) = user_fields(&query.from);

    Some(IncomingCallback {
        chat_id: message.chat().id.0,
        message_id: message.id().0,
        user_id,
        user_name,
        data,
    })
}

/// Slash-command list shown by Telegram clients
fn command_list() -> Vec<TelegramCommand> {
    BotCommand::ALL
        .iter()
        .map(|command| {
            TelegramCommand::new(command.text().trim_start_matches('/'), command.description())
        })
        .collect()
}

async fn on_message<C, M>(
    msg: Message,
    controller: Arc<ChatController<C, M>>,
    config: Arc<TelegramConfig>,
) -> ResponseResult<()>
where
    C: ConversationUseCase + 'static,
    M: Messenger + 'static,
{
    let Some(incoming) = incoming_message(&msg) else {
        debug!(chat_id = %msg.chat.id.0, "Ignoring non-text message");
        return Ok(());
    };

    if config.debug {
        info!(
            chat_id = %incoming.chat_id,
            user_id = %incoming.user_id,
            text = %incoming.text,
            "Telegram message received"
        );
    }

    controller.handle_message(incoming).await;
    Ok(())
}

async fn on_callback<C, M>(
    bot: Bot,
    query: CallbackQuery,
    controller: Arc<ChatController<C, M>>,
    config: Arc<TelegramConfig>,
) -> ResponseResult<()>
where
    C: ConversationUseCase + 'static,
    M: Messenger + 'static,
{
    match incoming_callback(&query) {
        Some(incoming) => {
            if config.debug {
                info!(
                    chat_id = %incoming.chat_id,
                    user_id = %incoming.user_id,
                    data = %incoming.data,
                    "Telegram callback received"
                );
            }
            controller.handle_callback(incoming).await;
        }
        None => debug!(user_id = %query.from.id.0, "Ignoring callback without data or message"),
    }

    // Stops the client's loading indicator
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }
    Ok(())
}

/// Register commands and long-poll until Ctrl-C
pub async fn run_polling<C, M>(
    bot: Bot,
    config: TelegramConfig,
    controller: Arc<ChatController<C, M>>,
) where
    C: ConversationUseCase + 'static,
    M: Messenger + 'static,
{
    if let Err(e) = bot.set_my_commands(command_list()).await {
        warn!(error = %e, "Failed to set Telegram bot commands");
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message::<C, M>))
        .branch(Update::filter_callback_query().endpoint(on_callback::<C, M>));

    info!(debug = config.debug, "Telegram polling started");

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .dependencies(dptree::deps![controller, Arc::new(config)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Telegram polling stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message_json(text: Option<&str>, username: Option<&str>) -> serde_json::Value {
        let mut from = json!({ "id": 7, "is_bot": false, "first_name": "Alice" });
        if let Some(name) = username {
            from["username"] = json!(name);
        }
        let mut msg = json!({
            "message_id": 31,
            "date": 1700000000,
            "chat": { "id": 500, "type": "private", "first_name": "Alice" },
            "from": from,
        });
        if let Some(text) = text {
            msg["text"] = json!(text);
        }
        msg
    }

    #[test]
    fn test_incoming_text_message() {
        let msg: Message = serde_json::from_value(message_json(Some("/start"), Some("alice"))).unwrap();
        let incoming = incoming_message(&msg).unwrap();

        assert_eq!(incoming.chat_id, 500);
        assert_eq!(incoming.message_id, 31);
        assert_eq!(incoming.user_id, 7);
        assert_eq!(incoming.user_name.as_deref(), Some("alice"));
        assert_eq!(incoming.text, "/start");
    }

    #[test]
    fn test_message_without_username() {
        let msg: Message = serde_json::from_value(message_json(Some("hi"), None)).unwrap();
        assert!(incoming_message(&msg).unwrap().user_name.is_none());
    }

    #[test]
    fn test_incoming_callback() {
        let query: CallbackQuery = serde_json::from_value(json!({
            "id": "cb-1",
            "from": { "id": 7, "is_bot": false, "first_name": "Alice", "username": "alice" },
            "chat_instance": "ci",
            "data": "/menu",
            "message": message_json(Some("What would you like to do?"), Some("parlor_bot")),
        }))
        .unwrap();

        let incoming = incoming_callback(&query).unwrap();
        assert_eq!(incoming.chat_id, 500);
        assert_eq!(incoming.message_id, 31);
        assert_eq!(incoming.user_id, 7);
        assert_eq!(incoming.data, "/menu");
    }

    #[test]
    fn test_command_list_matches_bot_commands() {
        let commands = command_list();
        assert_eq!(commands.len(), BotCommand::ALL.len());
        assert_eq!(commands[0].command, "start");
        assert!(commands.iter().all(|c| !c.command.starts_with('/')));
    }
}
