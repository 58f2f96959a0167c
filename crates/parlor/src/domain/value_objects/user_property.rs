//! UserProperty - single-field updates a user can request

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// A user-editable field of the User aggregate or its current character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserProperty {
    /// Current character's system prompt
    Prompt,
    UserName,
    UserDescription,
    /// Current character's name
    CharacterName,
    /// Current character's greeting
    Greeting,
}

impl UserProperty {
    /// Whether the incoming value is placeholder-expanded before assignment
    pub fn expands_placeholders(&self) -> bool {
        matches!(
            self,
            UserProperty::Prompt | UserProperty::UserDescription | UserProperty::Greeting
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserProperty::Prompt => "Prompt",
            UserProperty::UserName => "UserName",
            UserProperty::UserDescription => "UserDescription",
            UserProperty::CharacterName => "CharacterName",
            UserProperty::Greeting => "Greeting",
        }
    }
}

impl std::fmt::Display for UserProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserProperty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Prompt" => Ok(UserProperty::Prompt),
            "UserName" => Ok(UserProperty::UserName),
            "UserDescription" => Ok(UserProperty::UserDescription),
            "CharacterName" => Ok(UserProperty::CharacterName),
            "Greeting" => Ok(UserProperty::Greeting),
            _ => Err(DomainError::InvalidProperty(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        for prop in [
            UserProperty::Prompt,
            UserProperty::UserName,
            UserProperty::UserDescription,
            UserProperty::CharacterName,
            UserProperty::Greeting,
        ] {
            assert_eq!(prop.as_str().parse::<UserProperty>().unwrap(), prop);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "Avatar".parse::<UserProperty>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidProperty(name) if name == "Avatar"));
    }

    #[test]
    fn test_verbatim_fields() {
        assert!(!UserProperty::UserName.expands_placeholders());
        assert!(!UserProperty::CharacterName.expands_placeholders());
        assert!(UserProperty::Prompt.expands_placeholders());
    }
}
