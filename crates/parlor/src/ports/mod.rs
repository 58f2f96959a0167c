//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! interacts with external systems (repositories, services,
//! and the messaging platform driving the conversation).
//!
//! Implementations of the outbound traits live in the adapter crates.

pub mod conversation;
pub mod repositories;
pub mod services;

// Re-exports
pub use conversation::*;
pub use repositories::*;
pub use services::*;
