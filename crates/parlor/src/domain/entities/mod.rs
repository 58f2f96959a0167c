//! Domain Entities
//!
//! - User: aggregate root, one per platform user
//! - CharacterPreset: persona owned by a user
//! - ChatMessage: role-tagged history entry

mod character;
mod chat_message;
mod user;

pub use character::*;
pub use chat_message::*;
pub use user::*;
