//! Character Preset - a persona with its own prompt and chat history
//!
//! Pure domain entity owned by a [`User`](super::User).

use serde::{Deserialize, Serialize};

use super::ChatMessage;
use crate::domain::placeholders;

pub const DEFAULT_CHARACTER_NAME: &str = "Default";
pub const DEFAULT_GREETING: &str = "Hello! How can I help you today?";
pub const DEFAULT_PROMPT: &str = "You are a helpful AI assistant.";

/// Character preset - name, greeting, system prompt and bounded chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterPreset {
    /// Slot assigned when the preset is added to a user
    #[serde(default)]
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub greeting: String,
    /// System prompt; empty means no system message is sent
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub chat: Vec<ChatMessage>,
}

impl CharacterPreset {
    pub fn new(
        name: impl Into<String>,
        greeting: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            greeting: greeting.into(),
            prompt: prompt.into(),
            chat: Vec::new(),
        }
    }

    /// Append a message and trim the history to `limit`
    pub fn push_message(&mut self, message: ChatMessage, limit: usize) {
        self.chat.push(message);
        self.trim_history(limit);
    }

    /// Keep only the `limit` most recent messages
    pub fn trim_history(&mut self, limit: usize) {
        if self.chat.len() > limit {
            let excess = self.chat.len() - limit;
            self.chat.drain(..excess);
        }
    }

    /// Optional system prompt followed by the chat history, rebuilt on every call
    pub fn messages_for_model(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.chat.len() + 1);
        if !self.prompt.is_empty() {
            messages.push(ChatMessage::system(self.prompt.clone()));
        }
        messages.extend(self.chat.iter().cloned());
        messages
    }

    /// Expand `{{char}}` only
    pub fn replace_placeholders(&self, input: &str) -> String {
        placeholders::expand(input, None, Some(&self.name))
    }
}

impl Default for CharacterPreset {
    fn default() -> Self {
        Self::new(DEFAULT_CHARACTER_NAME, DEFAULT_GREETING, DEFAULT_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn test_default_preset() {
        let preset = CharacterPreset::default();
        assert_eq!(preset.id, 0);
        assert_eq!(preset.name, "Default");
        assert_eq!(preset.greeting, DEFAULT_GREETING);
        assert_eq!(preset.prompt, "You are a helpful AI assistant.");
        assert!(preset.chat.is_empty());
    }

    #[test]
    fn test_history_bound_keeps_most_recent() {
        for limit in 0..6 {
            let mut preset = CharacterPreset::default();
            for n in 0..12 {
                preset.push_message(ChatMessage::user(n.to_string()), limit);
                assert!(preset.chat.len() <= limit);

                let appended = n + 1;
                let kept = appended.min(limit);
                let expected: Vec<String> =
                    (appended - kept..appended).map(|i| i.to_string()).collect();
                let actual: Vec<String> = preset.chat.iter().map(|m| m.content.clone()).collect();
                assert_eq!(actual, expected, "limit {limit} after {appended} appends");
            }
        }
    }

    #[test]
    fn test_messages_for_model_with_prompt() {
        let mut preset = CharacterPreset::default();
        preset.chat.push(ChatMessage::user("Hello"));
        preset.chat.push(ChatMessage::assistant("Hi"));

        let messages = preset.messages_for_model();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], ChatMessage::system(DEFAULT_PROMPT));
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
    }

    #[test]
    fn test_messages_for_model_without_prompt() {
        let mut preset = CharacterPreset::new("Bob", "", "");
        preset.chat.push(ChatMessage::user("Hello"));

        assert_eq!(preset.messages_for_model(), vec![ChatMessage::user("Hello")]);
    }

    #[test]
    fn test_replace_char_only() {
        let preset = CharacterPreset::new("Bob", "", "");
        assert_eq!(
            preset.replace_placeholders("{{user}} talks to {{char}}"),
            "{{user}} talks to Bob"
        );
    }
}
