//! Typed shapes of the three generated artifacts.
//!
//! The field names are the wire keys the prompts ask the model to answer
//! with, and the keys the HTTP API hands back to its clients.

use serde::{Deserialize, Deserializer, Serialize};

// ─────────────────────────────────────────────
// Topics
// ─────────────────────────────────────────────

/// One candidate topic.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeneratedTopic {
    pub title: String,
    pub description: String,
    pub reason: String,
}

/// `{ "topics": [...] }`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TopicsResponse {
    pub topics: Vec<GeneratedTopic>,
}

// ─────────────────────────────────────────────
// Script
// ─────────────────────────────────────────────

/// One timed beat of a video script.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScriptSegment {
    pub timestamp: String,
    pub content: String,
    pub visual_note: String,
}

/// A short-video script.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeneratedScript {
    pub title: String,
    pub hook: String,
    pub main_content: Vec<ScriptSegment>,
    pub call_to_action: String,
    pub hashtags: Vec<String>,
}

/// `{ "script": {...} }`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScriptResponse {
    pub script: GeneratedScript,
}

// ─────────────────────────────────────────────
// Copy
// ─────────────────────────────────────────────

/// Platform-tailored marketing copy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeneratedCopy {
    pub main_text: String,
    pub hashtags: Vec<String>,
    pub emojis_suggestion: String,
    /// Models answer this as either `"120字"` or `120`.
    #[serde(deserialize_with = "string_or_number")]
    pub length: String,
    pub engagement_tips: String,
}

/// `{ "copy": {...} }`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CopyResponse {
    pub copy: GeneratedCopy,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
