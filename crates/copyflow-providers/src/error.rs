//! Errors raised while turning a prompt into parsed JSON.

use thiserror::Error;

/// Every failure of a single generation round trip. None are retried.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("unsupported AI provider: {0}")]
    UnknownProvider(String),

    #[error("model {model} not found for provider {provider}")]
    UnknownModel { provider: String, model: String },

    #[error("API key not configured for provider: {0}")]
    MissingCredential(String),

    #[error("no content generated")]
    EmptyResponse,

    #[error("response is not valid JSON: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// Network failure, non-2xx status, or an undecodable completion envelope.
    #[error("error calling LLM: {0}")]
    Transport(String),
}
