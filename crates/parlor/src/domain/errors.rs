//! Domain Errors
//!
//! Error types for conversation operations.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Failed to load user {user_id}: {reason}")]
    Load { user_id: i64, reason: String },

    #[error("Failed to persist user {user_id}: {reason}")]
    Persist { user_id: i64, reason: String },

    #[error("Model error: {0}")]
    Model(#[from] ModelFailure),

    #[error("Unknown user property: {0}")]
    InvalidProperty(String),

    #[error("Invalid character index {index} (user has {count} characters)")]
    InvalidIndex { index: usize, count: usize },

    #[error("External service error: {0}")]
    ExternalService(String),
}

/// Why a model completion failed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelFailure {
    #[error("request timed out")]
    Timeout,

    #[error("endpoint returned status {status}")]
    Status { status: u16, body: String },

    #[error("no response choices returned")]
    EmptyChoices,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl DomainError {
    pub fn load<E: std::fmt::Display>(user_id: i64, err: E) -> Self {
        Self::Load {
            user_id,
            reason: err.to_string(),
        }
    }

    pub fn persist<E: std::fmt::Display>(user_id: i64, err: E) -> Self {
        Self::Persist {
            user_id,
            reason: err.to_string(),
        }
    }

    /// True when the model call ran past its deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Model(ModelFailure::Timeout))
    }
}
