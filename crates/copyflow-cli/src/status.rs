//! `copyflow status` — show configuration and provider status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use copyflow_core::config::load_config;
use copyflow_providers::registry::{find_by_name, ProviderRegistry};

use crate::helpers;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = helpers::resolve_config_path(config_path);
    let config = load_config(Some(&path));
    let registry = ProviderRegistry::from_config(&config.providers);
    let defaults = &config.studio.defaults;

    helpers::print_banner();
    println!("  {}", "Status".bold());
    println!();

    println!(
        "  {:<14} {} {}",
        "Config:".bold(),
        path.display(),
        if path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!(
        "  {:<14} {}:{}",
        "Listen:".bold(),
        config.server.host,
        config.server.port
    );
    println!(
        "  {:<14} {} / {}",
        "Default model:".bold(),
        defaults.provider,
        defaults.model
    );
    println!(
        "  {:<14} {}",
        "Defaults:".bold(),
        format!(
            "platform {} | style {} | duration {}",
            defaults.platform, defaults.style, defaults.duration
        )
        .dimmed()
    );

    println!();
    println!("  {}", "Providers:".bold());
    for provider in registry.list_providers() {
        let state = if provider.is_available() {
            format!("{} (key set)", "✓".green())
        } else {
            let hint = find_by_name(&provider.id).map_or(String::new(), |s| format!(", set {}", s.env_key));
            format!("{}", format!("· not configured{hint}").dimmed())
        };
        println!("    {:<12} {}", provider.name, state);
        println!("    {:<12} {}", "", provider.api_base().dimmed());
        for model in &provider.models {
            println!(
                "      {:<22} {}",
                model.id,
                format!("max {} tokens, ${}/1K", model.max_tokens, model.cost_per_1k_tokens).dimmed()
            );
        }
    }

    match registry.default_selection() {
        Some((model, provider)) => {
            println!();
            println!("  {:<14} {} / {}", "Preselected:".bold(), provider, model);
        }
        None => {
            println!();
            println!(
                "  {}",
                "No provider is configured; generation requests will fail.".yellow()
            );
        }
    }
    println!();

    Ok(())
}
