//! Messenger Port
//!
//! Outbound side of the messaging platform: sending replies (with an
//! optional inline menu) and deleting earlier messages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// One inline button; pressing it delivers `command` back as callback data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuButton {
    pub label: String,
    pub command: String,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// Inline keyboard rendered under a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub rows: Vec<Vec<MenuButton>>,
}

/// A reply to deliver to a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    /// Text uses the platform's HTML markup
    pub html: bool,
    pub menu: Option<Menu>,
}

impl OutgoingMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: false,
            menu: None,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: true,
            menu: None,
        }
    }

    pub fn with_menu(mut self, menu: Menu) -> Self {
        self.menu = Some(menu);
        self
    }
}

/// Messaging platform interface
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a message and return its platform message ID
    async fn send_message(
        &self,
        chat_id: i64,
        message: &OutgoingMessage,
    ) -> Result<i32, DomainError>;

    /// Delete a previously sent or received message
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), DomainError>;
}
