//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod llama_cpp;
pub mod postgres;

// Re-exports
pub use llama_cpp::LlamaCppGateway;
pub use postgres::PgUserRepository;
