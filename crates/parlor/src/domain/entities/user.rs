//! User - the aggregate root for one end-user's conversation state
//!
//! A user always owns at least one character and always points at a
//! valid one. Both facts are restored when a document is decoded and
//! are preserved by every mutating method, so readers never need to
//! repair anything themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CharacterPreset;
use crate::domain::errors::DomainError;
use crate::domain::placeholders;
use crate::domain::value_objects::{tag_serde, PendingCommand};

/// User - platform user with characters and bookkeeping fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UserDocument")]
pub struct User {
    /// Platform user identifier
    pub id: i64,
    pub user_name: String,
    pub user_description: String,
    characters: Vec<CharacterPreset>,
    current_character_index: usize,
    /// Time of the latest inbound request
    pub request_time: DateTime<Utc>,
    #[serde(with = "tag_serde")]
    pub pending_command: Option<PendingCommand>,
    /// Last message the bot sent to this user, deleted on the next interaction
    pub last_message_id: Option<i32>,
}

/// Stored shape of a user, decoded leniently before invariants are restored
#[derive(Deserialize)]
struct UserDocument {
    id: i64,
    #[serde(default)]
    user_name: String,
    #[serde(default)]
    user_description: String,
    #[serde(default)]
    characters: Vec<CharacterPreset>,
    #[serde(default)]
    current_character_index: usize,
    #[serde(default = "Utc::now")]
    request_time: DateTime<Utc>,
    #[serde(default, with = "tag_serde")]
    pending_command: Option<PendingCommand>,
    #[serde(default)]
    last_message_id: Option<i32>,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        let mut user = Self {
            id: doc.id,
            user_name: doc.user_name,
            user_description: doc.user_description,
            characters: doc.characters,
            current_character_index: doc.current_character_index,
            request_time: doc.request_time,
            pending_command: doc.pending_command,
            last_message_id: doc.last_message_id,
        };
        if user.restore_invariants() {
            tracing::warn!(user_id = %user.id, "Repaired invalid character state in stored user");
        }
        user
    }
}

impl User {
    /// Create a new user with a single default character
    pub fn new(id: i64, user_name: impl Into<String>) -> Self {
        Self {
            id,
            user_name: user_name.into(),
            user_description: String::new(),
            characters: vec![CharacterPreset::default()],
            current_character_index: 0,
            request_time: Utc::now(),
            pending_command: None,
            last_message_id: None,
        }
    }

    /// Reset an out-of-range index to 0, recreating the default character
    /// if the list is empty. Returns true when anything changed.
    pub fn restore_invariants(&mut self) -> bool {
        let mut repaired = false;
        if self.characters.is_empty() {
            self.characters.push(CharacterPreset::default());
            repaired = true;
        }
        if self.current_character_index >= self.characters.len() {
            self.current_character_index = 0;
            repaired = true;
        }
        repaired
    }

    pub fn characters(&self) -> &[CharacterPreset] {
        &self.characters
    }

    pub fn current_character_index(&self) -> usize {
        self.current_character_index
    }

    pub fn current_character(&self) -> &CharacterPreset {
        &self.characters[self.current_character_index]
    }

    pub fn current_character_mut(&mut self) -> &mut CharacterPreset {
        &mut self.characters[self.current_character_index]
    }

    /// Append a character in the next slot and make it current.
    /// Returns its index.
    pub fn add_character(&mut self, mut preset: CharacterPreset) -> usize {
        let index = self.characters.len();
        preset.id = index;
        self.characters.push(preset);
        self.current_character_index = index;
        index
    }

    /// Make the character at `index` current
    pub fn switch_character(&mut self, index: usize) -> Result<(), DomainError> {
        if index >= self.characters.len() {
            return Err(DomainError::InvalidIndex {
                index,
                count: self.characters.len(),
            });
        }
        self.current_character_index = index;
        Ok(())
    }

    /// Expand `{{user}}` and `{{char}}` against this user and the current character
    pub fn replace_placeholders(&self, input: &str) -> String {
        placeholders::expand(
            input,
            Some(&self.user_name),
            Some(&self.current_character().name),
        )
    }
}
