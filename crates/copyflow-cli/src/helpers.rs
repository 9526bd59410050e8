//! Shared CLI helpers — path expansion, studio wiring, banner.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;

use copyflow_core::config::{get_config_path, Config};
use copyflow_providers::{Dispatcher, ProviderRegistry};
use copyflow_studio::ContentStudio;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// The config file actually in use.
pub fn resolve_config_path(path: Option<&Path>) -> PathBuf {
    path.map(PathBuf::from).unwrap_or_else(get_config_path)
}

/// Wire the registry, dispatcher, and studio from a loaded config.
pub fn build_studio(config: &Config) -> Result<ContentStudio> {
    let registry = Arc::new(ProviderRegistry::from_config(&config.providers));
    let timeout = Duration::from_secs(config.studio.request_timeout_secs);
    let dispatcher = Dispatcher::new(registry, timeout).context("failed to create LLM dispatcher")?;
    Ok(ContentStudio::new(dispatcher, config.studio.clone()))
}

pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "✍️  Copyflow".cyan().bold(), version.dimmed());
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/foo/bar");
        assert!(result.ends_with("foo/bar"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
        assert_eq!(expand_tilde("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn resolve_config_path_prefers_explicit() {
        let explicit = Path::new("/tmp/copyflow.json");
        assert_eq!(resolve_config_path(Some(explicit)), explicit);
        assert!(resolve_config_path(None).ends_with(".copyflow/config.json"));
    }

    #[test]
    fn build_studio_carries_config() {
        let mut config = Config::default();
        config.providers.deepseek.api_key = "ds-key".to_string();
        config.studio.defaults.platform = "B站".to_string();

        let studio = build_studio(&config).unwrap();
        assert!(studio.registry().is_available("deepseek"));
        assert!(!studio.registry().is_available("openai"));
        assert_eq!(studio.config().defaults.platform, "B站");
    }
}
