//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig`, `StudioConfig`, `ServerConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.copyflow/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub studio: StudioConfig,
    pub server: ServerConfig,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single LLM provider (API key, base URL, headers).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication. Empty means the provider is unavailable.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

/// One `ProviderConfig` per supported LLM backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub deepseek: ProviderConfig,
}

impl ProvidersConfig {
    /// Get a provider config by name (e.g. `"deepseek"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "openai" => Some(&self.openai),
            "deepseek" => Some(&self.deepseek),
            _ => None,
        }
    }

    /// Mutable variant of [`get_by_name`](Self::get_by_name).
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        match name {
            "openai" => Some(&mut self.openai),
            "deepseek" => Some(&mut self.deepseek),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────
// Studio (generation defaults + sampling)
// ─────────────────────────────────────────────

/// Generation settings shared by the HTTP API and the one-shot CLI commands.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudioConfig {
    pub defaults: GenerationDefaults,
    /// A partial section only replaces the keys it names; the rest keep
    /// the artifact's own defaults.
    #[serde(deserialize_with = "topics_sampling")]
    pub topics: SamplingConfig,
    #[serde(deserialize_with = "script_sampling")]
    pub script: SamplingConfig,
    #[serde(deserialize_with = "copy_sampling")]
    pub copy: SamplingConfig,
    /// Timeout for one upstream chat-completion call, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            defaults: GenerationDefaults::default(),
            topics: SamplingConfig::TOPICS,
            script: SamplingConfig::SCRIPT,
            copy: SamplingConfig::COPY,
            request_timeout_secs: 120,
        }
    }
}

/// Values used when a request leaves a field unset.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationDefaults {
    pub platform: String,
    pub style: String,
    pub duration: String,
    pub model: String,
    pub provider: String,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            platform: "抖音".to_string(),
            style: "活泼有趣".to_string(),
            duration: "60秒".to_string(),
            model: "deepseek-chat".to_string(),
            provider: "deepseek".to_string(),
        }
    }
}

/// Sampling parameters for one artifact type.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Requested output budget; clamped to the model's maximum at call time.
    pub max_tokens: u32,
}

impl SamplingConfig {
    pub const TOPICS: Self = Self::new(0.8, 2000);
    pub const SCRIPT: Self = Self::new(0.7, 3000);
    pub const COPY: Self = Self::new(0.7, 1500);

    pub const fn new(temperature: f64, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// On-disk shape of a sampling section: every key optional.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SamplingOverrides {
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl SamplingOverrides {
    fn over(self, base: SamplingConfig) -> SamplingConfig {
        SamplingConfig {
            temperature: self.temperature.unwrap_or(base.temperature),
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
        }
    }
}

fn sampling_over<'de, D>(deserializer: D, base: SamplingConfig) -> Result<SamplingConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = Option::<SamplingOverrides>::deserialize(deserializer)?;
    Ok(overrides.unwrap_or_default().over(base))
}

fn topics_sampling<'de, D: Deserializer<'de>>(d: D) -> Result<SamplingConfig, D::Error> {
    sampling_over(d, SamplingConfig::TOPICS)
}

fn script_sampling<'de, D: Deserializer<'de>>(d: D) -> Result<SamplingConfig, D::Error> {
    sampling_over(d, SamplingConfig::SCRIPT)
}

fn copy_sampling<'de, D: Deserializer<'de>>(d: D) -> Result<SamplingConfig, D::Error> {
    sampling_over(d, SamplingConfig::COPY)
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// HTTP API listen address.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
