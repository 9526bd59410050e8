//! LLM provider layer for Copyflow.
//!
//! # Architecture
//!
//! - [`registry`] — static provider/model table + the runtime [`ProviderRegistry`]
//! - [`traits::LlmProvider`] — trait that all providers implement
//! - [`http_provider::HttpProvider`] — generic OpenAI-compatible HTTP client
//! - [`dispatcher::Dispatcher`] — prompt in, parsed JSON out
//! - [`error::GenerationError`] — everything that can go wrong on the way

pub mod dispatcher;
pub mod error;
pub mod http_provider;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use dispatcher::{extract_json, strip_code_fence, Dispatcher};
pub use error::GenerationError;
pub use http_provider::HttpProvider;
pub use registry::{Model, Provider, ProviderRegistry, ProviderSpec, PROVIDERS};
pub use traits::{LlmProvider, LlmRequestConfig};
