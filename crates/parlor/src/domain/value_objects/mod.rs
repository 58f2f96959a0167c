//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod pending_command;
mod user_property;

pub(crate) use pending_command::tag_serde;
pub use pending_command::PendingCommand;
pub use user_property::UserProperty;
