//! Chat Controller
//!
//! Routes one inbound event to the conversation use cases: commands,
//! answers to a pending command, or a fresh model turn. Also keeps the
//! chat tidy by deleting the previous bot message on each interaction.
//!
//! Failures never propagate out of here. Each one is logged and the user
//! gets a short apology instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::commands::{main_menu, BotCommand};
use crate::domain::{CharacterPreset, DomainError, PendingCommand, User, UserProperty};
use crate::ports::{ConversationUseCase, Messenger, OutgoingMessage};

const LOAD_APOLOGY: &str = "An error occurred while fetching your data. Please try again later.";
const CALLBACK_APOLOGY: &str = "An error occurred. Please try again.";
const INPUT_APOLOGY: &str = "An error occurred while processing your input. Please try again.";
const UNKNOWN_COMMAND: &str = "Unknown command. Use /menu to see available options.";
const INVALID_CHARACTER_NUMBER: &str =
    "Invalid character number. Please enter a valid number from the list.";

/// A text message received from the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub message_id: i32,
    pub user_id: i64,
    /// Platform username, if the user has one
    pub user_name: Option<String>,
    pub text: String,
}

/// An inline-button press
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingCallback {
    pub chat_id: i64,
    /// The message carrying the pressed keyboard
    pub message_id: i32,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub data: String,
}

/// Short user-facing text for a failed operation
pub fn apology(err: &DomainError) -> &'static str {
    match err {
        DomainError::Load { .. } => LOAD_APOLOGY,
        DomainError::Persist { .. } => "Sorry, I couldn't save your changes. Please try again.",
        DomainError::Model(_) if err.is_timeout() => {
            "Sorry, the model took too long to answer. Please try again."
        }
        DomainError::Model(_) => "I'm sorry, I couldn't process your request. Please try again.",
        DomainError::InvalidProperty(_)
        | DomainError::InvalidIndex { .. }
        | DomainError::ExternalService(_) => INPUT_APOLOGY,
    }
}

fn display_name(user_id: i64, user_name: Option<&str>) -> String {
    match user_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("User{user_id}"),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn pending_prompt(pending: PendingCommand) -> &'static str {
    match pending {
        PendingCommand::SwitchCharacter => {
            "Please enter the number of the character you want to switch to."
        }
        PendingCommand::SetPrompt => "Please enter the new prompt for the current character:",
        PendingCommand::SetGreeting => "Please enter the new greeting for the current character:",
        PendingCommand::SetCharacterName => "Please enter the new name for the current character:",
        PendingCommand::SetUserName => "Please enter your new username:",
        PendingCommand::SetUserDescription => "Please enter your new description:",
    }
}

fn updated_text(property: UserProperty) -> &'static str {
    match property {
        UserProperty::Prompt => "Prompt updated successfully!",
        UserProperty::Greeting => "Greeting updated successfully!",
        UserProperty::CharacterName => "Character name updated successfully!",
        UserProperty::UserName => "Your username updated successfully!",
        UserProperty::UserDescription => "Your description updated successfully!",
    }
}

/// Drives the conversation from platform events
pub struct ChatController<C: ConversationUseCase, M: Messenger> {
    conversation: Arc<C>,
    messenger: Arc<M>,
}

impl<C: ConversationUseCase, M: Messenger> ChatController<C, M> {
    pub fn new(conversation: Arc<C>, messenger: Arc<M>) -> Self {
        Self {
            conversation,
            messenger,
        }
    }

    /// Handle a text message: a command, a pending answer or a model turn
    pub async fn handle_message(&self, message: IncomingMessage) {
        let name = display_name(message.user_id, message.user_name.as_deref());
        let mut user = match self
            .conversation
            .get_or_create_user(message.user_id, &name)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                error!(user_id = %message.user_id, error = %e, "Failed to get or create user");
                self.send(message.chat_id, &OutgoingMessage::plain(apology(&e)))
                    .await;
                return;
            }
        };

        if let Some(previous) = user.last_message_id.take() {
            self.delete(message.chat_id, previous).await;
            self.save_logged(&user, "resetting last message").await;
        }

        if message.text.starts_with('/') {
            self.handle_command(&mut user, message.chat_id, Some(message.message_id), &message.text)
                .await;
        } else {
            self.handle_text(&mut user, message.chat_id, &message.text)
                .await;
        }
    }

    /// Handle an inline-button press; the button data is a command
    pub async fn handle_callback(&self, callback: IncomingCallback) {
        let name = display_name(callback.user_id, callback.user_name.as_deref());
        let mut user = match self
            .conversation
            .get_or_create_user(callback.user_id, &name)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                error!(user_id = %callback.user_id, error = %e, "Failed to get or create user from callback");
                self.send(callback.chat_id, &OutgoingMessage::plain(CALLBACK_APOLOGY))
                    .await;
                return;
            }
        };

        if let Some(previous) = user.last_message_id.take() {
            if previous != callback.message_id {
                self.delete(callback.chat_id, previous).await;
            }
            self.save_logged(&user, "resetting last message").await;
        }

        // The keyboard message is replaced by the command's reply
        self.handle_command(
            &mut user,
            callback.chat_id,
            Some(callback.message_id),
            &callback.data,
        )
        .await;
    }

    async fn handle_command(
        &self,
        user: &mut User,
        chat_id: i64,
        source_message_id: Option<i32>,
        text: &str,
    ) {
        if user.pending_command.take().is_some() {
            self.save_logged(user, "resetting pending command").await;
        }

        let Some(command) = BotCommand::parse(text) else {
            debug!(user_id = %user.id, command = %text, "Unknown command");
            self.send(chat_id, &OutgoingMessage::plain(UNKNOWN_COMMAND))
                .await;
            return;
        };

        let reply = self.run_command(user, command).await;

        if let Some(message_id) = source_message_id {
            self.delete(chat_id, message_id).await;
        }
        self.send_and_record(user, chat_id, &reply).await;
    }

    async fn run_command(&self, user: &mut User, command: BotCommand) -> OutgoingMessage {
        match command {
            BotCommand::SwitchCharacter => {
                self.await_input(user, PendingCommand::SwitchCharacter).await
            }
            BotCommand::SetPrompt => self.await_input(user, PendingCommand::SetPrompt).await,
            BotCommand::SetGreeting => self.await_input(user, PendingCommand::SetGreeting).await,
            BotCommand::SetCharacterName => {
                self.await_input(user, PendingCommand::SetCharacterName).await
            }
            BotCommand::SetUserName => self.await_input(user, PendingCommand::SetUserName).await,
            BotCommand::SetUserDescription => {
                self.await_input(user, PendingCommand::SetUserDescription).await
            }
            BotCommand::Start => OutgoingMessage::plain(format!(
                "Hello, {}! I am your AI assistant. How can I help you today? \
                 You can use /menu to see available options.",
                user.user_name
            )),
            BotCommand::Menu => {
                OutgoingMessage::plain("What would you like to do?").with_menu(main_menu())
            }
            BotCommand::NewCharacter => {
                let preset = CharacterPreset::default();
                let name = preset.name.clone();
                match self.conversation.add_character(user, preset).await {
                    Ok(()) => OutgoingMessage::plain(format!(
                        "New character '{name}' added and set as current."
                    )),
                    Err(e) => {
                        error!(user_id = %user.id, error = %e, "Failed to add new character");
                        OutgoingMessage::plain("Failed to add new character.")
                    }
                }
            }
            BotCommand::ListCharacters => OutgoingMessage::plain(character_list(user)),
            BotCommand::ClearChat => match self.conversation.clear_chat_history(user).await {
                Ok(()) => OutgoingMessage::plain("Chat history cleared."),
                Err(e) => {
                    error!(user_id = %user.id, error = %e, "Failed to clear chat history");
                    OutgoingMessage::plain("Failed to clear chat history.")
                }
            },
            BotCommand::CharacterInfo => {
                let character = user.current_character();
                OutgoingMessage::html(format!(
                    "<b>Current Character Info:</b>\nName: {}\nGreeting: {}\nPrompt: {}\nChat Messages: {}/{}",
                    escape_html(&character.name),
                    escape_html(&character.greeting),
                    escape_html(&character.prompt),
                    character.chat.len(),
                    self.conversation.chat_history_limit()
                ))
            }
        }
    }

    /// Tag the user so their next free-text message answers `pending`
    async fn await_input(&self, user: &mut User, pending: PendingCommand) -> OutgoingMessage {
        user.pending_command = Some(pending);
        self.save_logged(user, "setting pending command").await;
        OutgoingMessage::plain(pending_prompt(pending))
    }

    async fn handle_text(&self, user: &mut User, chat_id: i64, text: &str) {
        let reply = match user.pending_command {
            Some(pending) => {
                let reply = self.handle_pending(user, pending, text).await;
                user.pending_command = None;
                self.save_logged(user, "clearing pending command").await;
                reply
            }
            None => match self.conversation.respond_to_user(user, text).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(user_id = %user.id, error = %e, "Failed to get model response");
                    apology(&e).to_string()
                }
            },
        };

        self.send_and_record(user, chat_id, &OutgoingMessage::plain(reply))
            .await;
    }

    async fn handle_pending(&self, user: &mut User, pending: PendingCommand, input: &str) -> String {
        let result = match pending.property() {
            Some(property) => self
                .conversation
                .update_user_property(user, property, input)
                .await
                .map(|()| updated_text(property).to_string()),
            None => {
                let count = user.characters().len();
                match input.trim().parse::<usize>() {
                    Ok(number) if (1..=count).contains(&number) => self
                        .conversation
                        .change_current_character(user, number - 1)
                        .await
                        .map(|()| {
                            format!("Switched to character: {}", user.current_character().name)
                        }),
                    _ => return INVALID_CHARACTER_NUMBER.to_string(),
                }
            }
        };

        result.unwrap_or_else(|e| {
            error!(user_id = %user.id, pending = %pending, error = %e, "Failed to handle pending command");
            apology(&e).to_string()
        })
    }

    async fn send_and_record(&self, user: &mut User, chat_id: i64, message: &OutgoingMessage) {
        if let Some(sent_id) = self.send(chat_id, message).await {
            user.last_message_id = Some(sent_id);
            self.save_logged(user, "recording last message").await;
        }
    }

    async fn send(&self, chat_id: i64, message: &OutgoingMessage) -> Option<i32> {
        match self.messenger.send_message(chat_id, message).await {
            Ok(id) => Some(id),
            Err(e) => {
                error!(chat_id = %chat_id, error = %e, "Failed to send message");
                None
            }
        }
    }

    async fn delete(&self, chat_id: i64, message_id: i32) {
        if let Err(e) = self.messenger.delete_message(chat_id, message_id).await {
            warn!(chat_id = %chat_id, message_id = message_id, error = %e, "Failed to delete message");
        }
    }

    async fn save_logged(&self, user: &User, action: &str) {
        if let Err(e) = self.conversation.save_user(user).await {
            error!(user_id = %user.id, error = %e, "Failed to save user after {}", action);
        }
    }
}

fn character_list(user: &User) -> String {
    let mut text = String::from("Your characters:\n");
    for (i, character) in user.characters().iter().enumerate() {
        let marker = if i == user.current_character_index() {
            " (current)"
        } else {
            ""
        };
        text.push_str(&format!("{}. {}{}\n", i + 1, character.name, marker));
    }
    text.push_str("\nUse /switchchar <number> to change.");
    text
}
