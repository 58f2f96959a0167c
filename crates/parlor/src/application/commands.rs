//! Bot commands and the main menu keyboard.

use crate::ports::{Menu, MenuButton};

/// Commands a user can send (or press as a menu button)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Menu,
    NewCharacter,
    ListCharacters,
    SwitchCharacter,
    SetPrompt,
    SetGreeting,
    SetCharacterName,
    SetUserName,
    SetUserDescription,
    ClearChat,
    CharacterInfo,
}

impl BotCommand {
    pub const ALL: [BotCommand; 12] = [
        BotCommand::Start,
        BotCommand::Menu,
        BotCommand::NewCharacter,
        BotCommand::ListCharacters,
        BotCommand::SwitchCharacter,
        BotCommand::SetPrompt,
        BotCommand::SetGreeting,
        BotCommand::SetCharacterName,
        BotCommand::SetUserName,
        BotCommand::SetUserDescription,
        BotCommand::ClearChat,
        BotCommand::CharacterInfo,
    ];

    /// Parse `/command` or `/command@botname`; trailing arguments are ignored
    pub fn parse(text: &str) -> Option<Self> {
        let token = text.split_whitespace().next()?;
        let name = token.split('@').next()?;
        Self::ALL.into_iter().find(|c| c.text() == name)
    }

    pub fn text(&self) -> &'static str {
        match self {
            BotCommand::Start => "/start",
            BotCommand::Menu => "/menu",
            BotCommand::NewCharacter => "/newchar",
            BotCommand::ListCharacters => "/listchar",
            BotCommand::SwitchCharacter => "/switchchar",
            BotCommand::SetPrompt => "/setprompt",
            BotCommand::SetGreeting => "/setgreeting",
            BotCommand::SetCharacterName => "/setcharname",
            BotCommand::SetUserName => "/setusername",
            BotCommand::SetUserDescription => "/setuserdesc",
            BotCommand::ClearChat => "/clearchat",
            BotCommand::CharacterInfo => "/charinfo",
        }
    }

    /// Short description for the platform's command list
    pub fn description(&self) -> &'static str {
        match self {
            BotCommand::Start => "Start talking",
            BotCommand::Menu => "Show the main menu",
            BotCommand::NewCharacter => "Add a new character",
            BotCommand::ListCharacters => "List your characters",
            BotCommand::SwitchCharacter => "Switch the current character",
            BotCommand::SetPrompt => "Set the character prompt",
            BotCommand::SetGreeting => "Set the character greeting",
            BotCommand::SetCharacterName => "Rename the character",
            BotCommand::SetUserName => "Change your name",
            BotCommand::SetUserDescription => "Change your description",
            BotCommand::ClearChat => "Clear the chat history",
            BotCommand::CharacterInfo => "Show the current character",
        }
    }
}

/// Main menu: five rows of two buttons
pub fn main_menu() -> Menu {
    let row = |a: (&str, BotCommand), b: (&str, BotCommand)| {
        vec![
            MenuButton::new(a.0, a.1.text()),
            MenuButton::new(b.0, b.1.text()),
        ]
    };

    Menu {
        rows: vec![
            row(
                ("New Character", BotCommand::NewCharacter),
                ("List Characters", BotCommand::ListCharacters),
            ),
            row(
                ("Switch Character", BotCommand::SwitchCharacter),
                ("Set Character Name", BotCommand::SetCharacterName),
            ),
            row(
                ("Set Prompt", BotCommand::SetPrompt),
                ("Set Greeting", BotCommand::SetGreeting),
            ),
            row(
                ("Set My Name", BotCommand::SetUserName),
                ("Set My Description", BotCommand::SetUserDescription),
            ),
            row(
                ("Clear Chat History", BotCommand::ClearChat),
                ("Character Info", BotCommand::CharacterInfo),
            ),
        ],
    }
}
