//! Conversation Service (Use Case)
//!
//! Owns the conversation rules: user lookup and creation, character
//! management, history bounding, placeholder expansion and the single
//! model call made per incoming message.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info};

use crate::domain::{
    CharacterPreset, ChatMessage, DomainError, Role, User, UserProperty,
};
use crate::ports::{ConversationUseCase, GenerationConfig, ModelGateway, UserRepository};

/// Application service for conversation operations
///
/// Holds no mutable state of its own; every operation works on the
/// `User` value handed in by the caller. Concurrent events for the same
/// user are not serialized here, and the later save replaces the whole
/// document.
pub struct ConversationService<R: UserRepository, G: ModelGateway> {
    repo: Arc<R>,
    gateway: Arc<G>,
    history_limit: usize,
    generation: GenerationConfig,
}

impl<R: UserRepository, G: ModelGateway> ConversationService<R, G> {
    pub fn new(repo: Arc<R>, gateway: Arc<G>, history_limit: usize) -> Self {
        Self {
            repo,
            gateway,
            history_limit,
            generation: GenerationConfig::default(),
        }
    }
}

/// Build the model-ready sequence for the user's current character.
///
/// Every message is expanded against the user; non-system messages are
/// then expanded again against the character.
pub fn model_context(user: &User) -> Vec<ChatMessage> {
    let character = user.current_character();
    character
        .messages_for_model()
        .into_iter()
        .map(|message| {
            let mut content = user.replace_placeholders(&message.content);
            if message.role != Role::System {
                content = character.replace_placeholders(&content);
            }
            ChatMessage::new(message.role, content)
        })
        .collect()
}

#[async_trait]
impl<R: UserRepository, G: ModelGateway> ConversationUseCase for ConversationService<R, G> {
    async fn get_or_create_user(
        &self,
        user_id: i64,
        display_name: &str,
    ) -> Result<User, DomainError> {
        let mut user = match self.repo.find_by_id(user_id).await? {
            Some(mut user) => {
                if user.user_name != display_name {
                    user.user_name = display_name.to_string();
                    if let Err(e) = self.repo.save(&user).await {
                        error!(user_id = %user_id, error = %e, "Failed to update username");
                    }
                }
                user
            }
            None => {
                let user = User::new(user_id, display_name);
                self.repo.save(&user).await?;
                info!(user_id = %user_id, "Created new user");
                user
            }
        };

        user.request_time = Utc::now();
        Ok(user)
    }

    async fn save_user(&self, user: &User) -> Result<(), DomainError> {
        self.repo.save(user).await
    }

    async fn respond_to_user(&self, user: &mut User, text: &str) -> Result<String, DomainError> {
        let limit = self.history_limit;

        user.current_character_mut()
            .push_message(ChatMessage::user(text), limit);
        self.repo
            .save(user)
            .await
            .inspect_err(|e| error!(user_id = %user.id, error = %e, "Failed to save user message"))?;

        let messages = model_context(user);
        debug!(
            user_id = %user.id,
            character = %user.current_character().name,
            messages = messages.len(),
            "Requesting model completion"
        );

        let reply = self
            .gateway
            .complete_chat(&messages, &self.generation)
            .await
            .inspect_err(|e| error!(user_id = %user.id, error = %e, "Model completion failed"))?;

        user.current_character_mut()
            .push_message(ChatMessage::assistant(reply.clone()), limit);
        if let Err(e) = self.repo.save(user).await {
            // The reply still goes out; the stored history just lacks this turn
            error!(user_id = %user.id, error = %e, "Failed to save model reply");
        }

        Ok(reply)
    }

    async fn add_character(
        &self,
        user: &mut User,
        preset: CharacterPreset,
    ) -> Result<(), DomainError> {
        let index = user.add_character(preset);
        info!(user_id = %user.id, index = index, "Added character");
        self.repo.save(user).await
    }

    async fn clear_chat_history(&self, user: &mut User) -> Result<(), DomainError> {
        user.current_character_mut().chat = Vec::with_capacity(self.history_limit);
        self.repo.save(user).await
    }

    async fn update_user_property(
        &self,
        user: &mut User,
        property: UserProperty,
        value: &str,
    ) -> Result<(), DomainError> {
        let value = if property.expands_placeholders() {
            user.replace_placeholders(value)
        } else {
            value.to_string()
        };

        match property {
            UserProperty::Prompt => user.current_character_mut().prompt = value,
            UserProperty::UserName => user.user_name = value,
            UserProperty::UserDescription => user.user_description = value,
            UserProperty::CharacterName => user.current_character_mut().name = value,
            UserProperty::Greeting => user.current_character_mut().greeting = value,
        }

        self.repo.save(user).await
    }

    async fn change_current_character(
        &self,
        user: &mut User,
        index: usize,
    ) -> Result<(), DomainError> {
        user.switch_character(index)?;
        self.repo.save(user).await
    }

    fn chat_history_limit(&self) -> usize {
        self.history_limit
    }
}
