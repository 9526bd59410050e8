//! `copyflow onboard` — write a default configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use copyflow_core::config::{save_config, Config};

use crate::helpers;

/// Run the onboard command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    helpers::print_banner();
    println!("  {}", "Setup".bold());
    println!();

    let path = helpers::resolve_config_path(config_path);
    if write_default_config(&path)? {
        println!("  {} created config at {}", "✓".green(), path.display());
    } else {
        println!("  {} config already exists at {}", "✓".green(), path.display());
    }

    println!();
    println!("  Add an API key under {} or export one of:", "providers".bold());
    println!("    {}", "DEEPSEEK_API_KEY".cyan());
    println!("    {}", "OPENAI_API_KEY".cyan());
    println!();
    println!("{}", "  Then run `copyflow status` to check, or `copyflow serve` to start.".green());
    println!();

    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
/// Returns whether a file was written.
///
/// Environment credentials are never written to disk.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    Ok(true)
}
