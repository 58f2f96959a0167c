//! PendingCommand - what the user's next free-text message answers
//!
//! Stored in the user document as a string tag; an empty string means
//! nothing is pending.

use super::UserProperty;

/// A command waiting for the user's next free-text message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingCommand {
    SwitchCharacter,
    SetPrompt,
    SetGreeting,
    SetCharacterName,
    SetUserName,
    SetUserDescription,
}

impl PendingCommand {
    pub fn tag(&self) -> &'static str {
        match self {
            PendingCommand::SwitchCharacter => "switch_character",
            PendingCommand::SetPrompt => "set_prompt",
            PendingCommand::SetGreeting => "set_greeting",
            PendingCommand::SetCharacterName => "set_character_name",
            PendingCommand::SetUserName => "set_user_name",
            PendingCommand::SetUserDescription => "set_user_description",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "switch_character" => Some(PendingCommand::SwitchCharacter),
            "set_prompt" => Some(PendingCommand::SetPrompt),
            "set_greeting" => Some(PendingCommand::SetGreeting),
            "set_character_name" => Some(PendingCommand::SetCharacterName),
            "set_user_name" => Some(PendingCommand::SetUserName),
            "set_user_description" => Some(PendingCommand::SetUserDescription),
            _ => None,
        }
    }

    /// The property this command updates; `None` for character switching
    pub fn property(&self) -> Option<UserProperty> {
        match self {
            PendingCommand::SwitchCharacter => None,
            PendingCommand::SetPrompt => Some(UserProperty::Prompt),
            PendingCommand::SetGreeting => Some(UserProperty::Greeting),
            PendingCommand::SetCharacterName => Some(UserProperty::CharacterName),
            PendingCommand::SetUserName => Some(UserProperty::UserName),
            PendingCommand::SetUserDescription => Some(UserProperty::UserDescription),
        }
    }
}

impl std::fmt::Display for PendingCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Serde adapter mapping `Option<PendingCommand>` to the stored string tag
pub(crate) mod tag_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::PendingCommand;

    pub fn serialize<S>(value: &Option<PendingCommand>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.map(|c| c.tag()).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<PendingCommand>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if tag.is_empty() {
            return Ok(None);
        }
        let command = PendingCommand::from_tag(&tag);
        if command.is_none() {
            tracing::warn!(tag = %tag, "Dropping unrecognised pending command tag");
        }
        Ok(command)
    }
}
