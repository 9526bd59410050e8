//! LLM Provider trait — the seam between the dispatcher and a backend.
//!
//! `HttpProvider` in `http_provider.rs` covers every OpenAI-compatible API.

use async_trait::async_trait;
use copyflow_core::types::{LlmResponse, Message};

use crate::error::GenerationError;

/// Sampling parameters passed to each LLM call.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            temperature: 0.7,
        }
    }
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one chat completion request.
    ///
    /// # Arguments
    /// * `messages` — Conversation in OpenAI format.
    /// * `model`    — Model identifier (e.g. `"deepseek-chat"`).
    /// * `config`   — Temperature and max_tokens, already clamped.
    ///
    /// Transport-level failures come back as [`GenerationError::Transport`].
    async fn chat(
        &self,
        messages: &[Message],
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<LlmResponse, GenerationError>;
}
