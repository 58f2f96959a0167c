//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the user repository, the model gateway and the messenger.

mod chat_controller;
mod commands;
mod conversation_service;

pub use chat_controller::{apology, ChatController, IncomingCallback, IncomingMessage};
pub use commands::{main_menu, BotCommand};
pub use conversation_service::{model_context, ConversationService};
