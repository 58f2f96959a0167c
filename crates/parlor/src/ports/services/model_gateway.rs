//! Model Gateway Port
//!
//! Abstract interface for chat completions against a remote
//! inference endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{errors::DomainError, ChatMessage};

/// Sampling parameters for one completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    pub temperature: f32,
    /// Nucleus sampling probability
    pub top_p: f32,
    /// 0 disables top-k truncation
    pub top_k: u32,
    pub repeat_penalty: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 0,
            repeat_penalty: 1.1,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        }
    }
}

/// Chat completion interface
///
/// Implementations must bound the call with their own deadline and
/// report expiry as `ModelFailure::Timeout`.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Complete the conversation and return the reply text.
    /// Fails with `DomainError::Model`.
    async fn complete_chat(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<String, DomainError>;
}
