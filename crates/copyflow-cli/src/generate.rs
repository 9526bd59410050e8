//! One-shot generation commands: `topics`, `script`, `copy`.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use copyflow_core::config::load_config;
use copyflow_core::content::{CopyResponse, ScriptResponse, TopicsResponse};
use copyflow_studio::{CopyRequest, ScriptRequest, TopicsRequest};

use crate::helpers;
use crate::GenerationArgs;

pub async fn topics(
    config_path: Option<&Path>,
    tags: Vec<String>,
    platform: Option<String>,
    args: &GenerationArgs,
) -> Result<()> {
    let studio = helpers::build_studio(&load_config(config_path))?;
    let request = TopicsRequest {
        tags,
        platform,
        model_id: args.model.clone(),
        provider_id: args.provider.clone(),
    };

    let response = studio
        .generate_topics(&request)
        .await
        .context("topic generation failed")?;
    if args.json {
        return print_json(&response);
    }
    print_topics(&response);
    Ok(())
}

pub async fn script(
    config_path: Option<&Path>,
    topic: String,
    platform: Option<String>,
    duration: Option<String>,
    args: &GenerationArgs,
) -> Result<()> {
    let studio = helpers::build_studio(&load_config(config_path))?;
    let request = ScriptRequest {
        topic,
        platform,
        duration,
        model_id: args.model.clone(),
        provider_id: args.provider.clone(),
    };

    let response = studio
        .generate_script(&request)
        .await
        .context("script generation failed")?;
    if args.json {
        return print_json(&response);
    }
    print_script(&response);
    Ok(())
}

pub async fn copy(
    config_path: Option<&Path>,
    content: String,
    platform: Option<String>,
    style: Option<String>,
    args: &GenerationArgs,
) -> Result<()> {
    let studio = helpers::build_studio(&load_config(config_path))?;
    let request = CopyRequest {
        content,
        platform,
        style,
        model_id: args.model.clone(),
        provider_id: args.provider.clone(),
    };

    let response = studio
        .generate_copy(&request)
        .await
        .context("copy generation failed")?;
    if args.json {
        return print_json(&response);
    }
    print_copy(&response);
    Ok(())
}

// ─────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize answer")?;
    println!("{text}");
    Ok(())
}

fn print_topics(response: &TopicsResponse) {
    println!();
    for (i, topic) in response.topics.iter().enumerate() {
        println!("{} {}", format!("{}.", i + 1).cyan().bold(), topic.title.bold());
        println!("   {}", topic.description);
        println!("   {} {}", "推荐理由:".dimmed(), topic.reason.dimmed());
        println!();
    }
}

fn print_script(response: &ScriptResponse) {
    let script = &response.script;
    println!();
    println!("{}", script.title.cyan().bold());
    println!();
    println!("{} {}", "开头:".bold(), script.hook);
    println!();
    for segment in &script.main_content {
        println!("{} {}", format!("[{}]", segment.timestamp).yellow(), segment.content);
        if !segment.visual_note.is_empty() {
            println!("   {} {}", "画面:".dimmed(), segment.visual_note.dimmed());
        }
    }
    println!();
    println!("{} {}", "结尾:".bold(), script.call_to_action);
    print_hashtags(&script.hashtags);
}

fn print_copy(response: &CopyResponse) {
    let copy = &response.copy;
    println!();
    println!("{}", copy.main_text);
    print_hashtags(&copy.hashtags);
    println!("{} {}", "表情建议:".bold(), copy.emojis_suggestion);
    println!("{} {}", "字数:".bold(), copy.length);
    println!("{} {}", "互动建议:".bold(), copy.engagement_tips);
    println!();
}

fn print_hashtags(hashtags: &[String]) {
    if hashtags.is_empty() {
        return;
    }
    println!();
    println!("{}", hashtags.join(" ").blue());
    println!();
}
