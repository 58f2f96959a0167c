//! Parlor Domain Library
//!
//! Conversation state and context assembly for a persona chat relay:
//! users keep several characters, each with its own prompt, greeting and
//! bounded chat history, and every turn is relayed to a local model.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure entities and logic
//!   - `entities/`: User, CharacterPreset, ChatMessage
//!   - `value_objects/`: PendingCommand, UserProperty
//!   - `placeholders`: `{{user}}` / `{{char}}` expansion
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Document persistence
//!   - `services/`: Model gateway and messenger
//!   - `conversation`: Use cases offered to platform adapters
//!
//! - **Application** (`application/`): ConversationService and ChatController
//!
//! # Usage
//!
//! ```rust,ignore
//! use parlor::application::{ChatController, ConversationService};
//! use parlor::ports::{Messenger, ModelGateway, UserRepository};
//! ```

pub mod application;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use application::{
    BotCommand, ChatController, ConversationService, IncomingCallback, IncomingMessage,
};
pub use domain::{
    CharacterPreset, ChatMessage, DomainError, ModelFailure, PendingCommand, Role, User,
    UserProperty,
};
pub use ports::{
    ConversationUseCase, GenerationConfig, Menu, MenuButton, Messenger, ModelGateway,
    OutgoingMessage, UserRepository,
};
