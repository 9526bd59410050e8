//! Content generation for Copyflow.
//!
//! - [`prompts`] — the three prompt templates
//! - [`catalog`] — platforms, styles, durations, and preset tags offered to clients
//! - [`studio::ContentStudio`] — validate, default, prompt, dispatch, type-check
//! - [`error::StudioError`] — façade-level failures

pub mod catalog;
pub mod error;
pub mod prompts;
pub mod studio;

pub use error::StudioError;
pub use studio::{ContentStudio, CopyRequest, ScriptRequest, TopicsRequest};
