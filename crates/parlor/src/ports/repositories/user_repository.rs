//! User Repository Port
//!
//! Abstract interface for User persistence. The aggregate is always
//! stored and loaded whole; there is no optimistic concurrency check,
//! so concurrent saves of the same user are last-writer-wins.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, ChatMessage, User};

/// Repository interface for User aggregates
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by platform ID. Fails with `DomainError::Load`.
    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, DomainError>;

    /// Insert or replace the whole user document. Fails with `DomainError::Persist`.
    async fn save(&self, user: &User) -> Result<(), DomainError>;

    /// Push one message onto a character's stored chat without rewriting the document
    async fn append_chat_message(
        &self,
        user_id: i64,
        character_index: usize,
        message: &ChatMessage,
    ) -> Result<(), DomainError>;
}
