//! Config loader — reads `~/.copyflow/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.copyflow/config.json`
//! 3. Environment variables `COPYFLOW_<SECTION>__<FIELD>` (override JSON)
//! 4. Plain provider keys (`OPENAI_API_KEY`, `DEEPSEEK_API_KEY`) for any
//!    credential still empty after step 3

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig, StudioConfig};

/// Provider name → conventional env var holding its API key.
pub const PROVIDER_KEY_VARS: &[(&str, &str)] = &[
    ("openai", "OPENAI_API_KEY"),
    ("deepseek", "DEEPSEEK_API_KEY"),
];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from `path` (or the default path) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    reject_invalid(apply_env_overrides(read_config_file(&config_path)))
}

/// Replace values that would make every request fail with their defaults.
fn reject_invalid(mut config: Config) -> Config {
    if config.studio.request_timeout_secs == 0 {
        let fallback = StudioConfig::default().request_timeout_secs;
        warn!(fallback, "requestTimeoutSecs must be positive, using default");
        config.studio.request_timeout_secs = fallback;
    }
    config
}

/// Read the JSON file only, without env overrides.
fn read_config_file(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides from the process environment.
fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`.
///
/// Supported keys:
/// - `COPYFLOW_PROVIDERS__<NAME>__API_KEY` / `__API_BASE`
/// - `COPYFLOW_STUDIO__DEFAULTS__{PLATFORM,STYLE,DURATION,MODEL,PROVIDER}`
/// - `COPYFLOW_STUDIO__REQUEST_TIMEOUT_SECS`
/// - `COPYFLOW_SERVER__HOST`, `COPYFLOW_SERVER__PORT`
/// - `OPENAI_API_KEY`, `DEEPSEEK_API_KEY` (only fill an empty key)
fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    for (name, fallback_var) in PROVIDER_KEY_VARS {
        if let Some(provider) = config.providers.get_by_name_mut(name) {
            apply_provider_env(provider, &name.to_uppercase(), fallback_var, &lookup);
        }
    }

    let defaults = &mut config.studio.defaults;
    if let Some(val) = lookup("COPYFLOW_STUDIO__DEFAULTS__PLATFORM") {
        defaults.platform = val;
    }
    if let Some(val) = lookup("COPYFLOW_STUDIO__DEFAULTS__STYLE") {
        defaults.style = val;
    }
    if let Some(val) = lookup("COPYFLOW_STUDIO__DEFAULTS__DURATION") {
        defaults.duration = val;
    }
    if let Some(val) = lookup("COPYFLOW_STUDIO__DEFAULTS__MODEL") {
        defaults.model = val;
    }
    if let Some(val) = lookup("COPYFLOW_STUDIO__DEFAULTS__PROVIDER") {
        defaults.provider = val;
    }
    if let Some(val) = lookup("COPYFLOW_STUDIO__REQUEST_TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(secs) => config.studio.request_timeout_secs = secs,
            Err(_) => warn!(value = %val, "ignoring invalid COPYFLOW_STUDIO__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(val) = lookup("COPYFLOW_SERVER__HOST") {
        config.server.host = val;
    }
    if let Some(val) = lookup("COPYFLOW_SERVER__PORT") {
        match val.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %val, "ignoring invalid COPYFLOW_SERVER__PORT"),
        }
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env<F>(provider: &mut ProviderConfig, name: &str, fallback_var: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(&format!("COPYFLOW_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Some(val) = lookup(&format!("COPYFLOW_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
    if provider.api_key.is_empty() {
        if let Some(val) = lookup(fallback_var) {
            provider.api_key = val;
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
