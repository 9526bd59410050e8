//! Copyflow Core — shared types, content schemas, configuration, and utilities.
//!
//! - **types**: OpenAI chat-completion wire types
//! - **content**: typed shapes of the three generated artifacts
//! - **config**: config schema, loader, and env var overrides
//! - **utils**: data paths and string helpers

pub mod config;
pub mod content;
pub mod types;
pub mod utils;
