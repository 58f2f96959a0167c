//! Conversation Port
//!
//! The complete set of operations a messaging-platform adapter may
//! call. Implemented by [`ConversationService`](crate::application::ConversationService).

use async_trait::async_trait;

use crate::domain::{errors::DomainError, CharacterPreset, User, UserProperty};

/// Inbound use cases driven by the messaging platform
///
/// The `User` passed in is the caller's working copy: operations mutate
/// it in memory and persist it whole before returning.
#[async_trait]
pub trait ConversationUseCase: Send + Sync {
    /// Load a user, creating and persisting a new one on first contact
    async fn get_or_create_user(
        &self,
        user_id: i64,
        display_name: &str,
    ) -> Result<User, DomainError>;

    /// Persist the user as-is
    async fn save_user(&self, user: &User) -> Result<(), DomainError>;

    /// Record the user's message, ask the model, record and return the reply
    async fn respond_to_user(&self, user: &mut User, text: &str) -> Result<String, DomainError>;

    /// Add a character and make it current
    async fn add_character(
        &self,
        user: &mut User,
        preset: CharacterPreset,
    ) -> Result<(), DomainError>;

    /// Empty the current character's chat history
    async fn clear_chat_history(&self, user: &mut User) -> Result<(), DomainError>;

    /// Set one user or character field
    async fn update_user_property(
        &self,
        user: &mut User,
        property: UserProperty,
        value: &str,
    ) -> Result<(), DomainError>;

    /// Make the character at `index` (0-based) current
    async fn change_current_character(
        &self,
        user: &mut User,
        index: usize,
    ) -> Result<(), DomainError>;

    /// Maximum messages kept per character
    fn chat_history_limit(&self) -> usize;
}
